use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;
use std::time::Duration;
use tokio::runtime::Builder;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use azure_events::cli::{AlertSettings, Arguments, ParseOutcome};
use azure_events::core::{AlertProvisioner, ProvisionError};
use azure_events::http::HttpClient;
use azure_events::report::render_table;

const EXIT_INVALID_ARGUMENTS: u8 = 1;
const EXIT_TENANT_NOT_FOUND: u8 = 2;
const EXIT_SERVICE_FAILURE: u8 = 255;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn main() -> ExitCode {
    // stdout is reserved for the results table
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let arguments = match Arguments::parse(std::env::args().skip(1)) {
        Ok(ParseOutcome::Help(text)) => {
            println!("{text}");
            return ExitCode::SUCCESS;
        }
        Ok(ParseOutcome::Parsed { arguments, errors }) => {
            if !errors.is_empty() {
                for error in &errors {
                    eprintln!("{}", error.to_string().red());
                }
                return ExitCode::from(EXIT_INVALID_ARGUMENTS);
            }
            arguments
        }
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            return ExitCode::from(EXIT_INVALID_ARGUMENTS);
        }
    };

    let Some(settings) = arguments.settings() else {
        eprintln!("{}", "Incomplete arguments".red());
        return ExitCode::from(EXIT_INVALID_ARGUMENTS);
    };
    debug!(?settings, "arguments parsed");

    let runtime = match Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", format!("Failed to create Tokio runtime: {e}").red());
            return ExitCode::from(EXIT_SERVICE_FAILURE);
        }
    };

    match runtime.block_on(run(&settings)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<ProvisionError>() {
            Some(tenant @ ProvisionError::TenantNotFound { .. }) => {
                eprintln!("{}", tenant.to_string().red());
                ExitCode::from(EXIT_TENANT_NOT_FOUND)
            }
            _ => {
                eprintln!("{}", "Whoops! Something went wrong...".red());
                eprintln!("{}", format!("{e:#}").red());
                ExitCode::from(EXIT_SERVICE_FAILURE)
            }
        },
    }
}

async fn run(settings: &AlertSettings) -> Result<()> {
    let provisioner = AlertProvisioner::new(HttpClient::new(REQUEST_TIMEOUT)?);

    println!("{}", "Create alert rules and notifications".cyan());
    let outcomes = provisioner.provision(settings).await?;

    print!("{}", render_table(&settings.resource_name, &outcomes));
    println!("{}", "Processing complete!".cyan());
    Ok(())
}
