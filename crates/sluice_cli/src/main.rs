//! Command line for provisioning HTTP endpoints backed by serverless functions.

mod aws;
mod output;

use clap::{Parser, Subcommand, ValueEnum};

use aws::AwsApis;
use output::Printer;
use sluice_core::bundle::{BASIC_POLICY, PROVISIONER_POLICY, S3_POLICY};
use sluice_core::config::{ProvisioningConfig, DEFAULT_RUNTIME};
use sluice_core::error::ProvisionError;
use sluice_core::provision::Provisioner;

#[derive(Parser)]
#[command(name = "sluice", version, about = "Provisions HTTP endpoints backed by serverless functions")]
struct Cli {
    /// Region to provision in.
    #[arg(long, global = true, default_value = "us-east-1")]
    region: String,

    /// Emit results and errors as JSON envelopes.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Published release bundle installed by `install`.
const RELEASE_BUNDLE_URL: &str =
    "https://github.com/sluice-tools/sluice/releases/download/latest/sluice.zip";

#[derive(Subcommand)]
enum Commands {
    /// Ensure a function exists and expose it behind a fresh HTTP endpoint.
    Create(CreateArgs),
    /// Install this tool itself as a function behind an endpoint. The
    /// endpoint always requires an API key.
    Install(InstallArgs),
    /// Attach a recurring trigger to an existing function.
    Schedule {
        /// Function to trigger.
        name: String,
        /// Schedule expression, e.g. "rate(10 minutes)".
        expression: String,
    },
    /// Manage execution roles.
    #[command(subcommand)]
    Role(RoleCommands),
    /// Manage API keys.
    #[command(subcommand)]
    Apikey(ApikeyCommands),
}

#[derive(clap::Args)]
struct CreateArgs {
    /// Name of the function to create or reuse.
    name: String,

    /// Execution role for newly created functions.
    #[arg(long)]
    role: Option<String>,

    /// Code bundle: a local zip path or an http(s) URL. Defaults to the
    /// built-in echo bundle.
    #[arg(long)]
    file: Option<String>,

    /// Authorization type registered on the endpoint method.
    #[arg(long, default_value = "NONE")]
    authentication: String,

    /// Require an API key on every request.
    #[arg(short = 'k', long)]
    apikey_required: bool,

    /// Runtime for newly created functions.
    #[arg(long, default_value = DEFAULT_RUNTIME)]
    runtime: String,

    /// Stop after the function exists; do not create a gateway.
    #[arg(long)]
    no_gateway: bool,
}

#[derive(clap::Args)]
struct InstallArgs {
    /// Name to install the function under.
    name: String,

    /// Execution role; create one with `sluice role create --type provisioner`.
    #[arg(long)]
    role: Option<String>,

    /// Runtime for the installed function.
    #[arg(long, default_value = DEFAULT_RUNTIME)]
    runtime: String,
}

#[derive(Subcommand)]
enum RoleCommands {
    /// List the roles visible to the caller.
    List,
    /// Create a role with a canned or custom inline policy.
    Create {
        name: String,
        /// Canned policy to attach.
        #[arg(long, value_enum, default_value_t = RoleKind::Basic)]
        r#type: RoleKind,
        /// Custom policy document; overrides --type.
        #[arg(long)]
        policy_file: Option<String>,
    },
}

#[derive(Subcommand)]
enum ApikeyCommands {
    /// List existing API keys.
    List,
    /// Create an API key, optionally bound to an endpoint's prod stage.
    Create {
        keyname: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        enabled: bool,
        /// Gateway container to bind the key to.
        #[arg(long)]
        api_id: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleKind {
    Basic,
    S3,
    Provisioner,
}

impl RoleKind {
    fn policy(self) -> &'static str {
        match self {
            RoleKind::Basic => BASIC_POLICY,
            RoleKind::S3 => S3_POLICY,
            RoleKind::Provisioner => PROVISIONER_POLICY,
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let printer = Printer::new(cli.json);

    log::debug!("provisioning against region {}", cli.region);
    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(cli.region.clone()))
        .load()
        .await;
    let apis = AwsApis::new(&sdk_config);

    match tokio::task::block_in_place(|| run(&cli, &apis)) {
        Ok(message) => printer.success(&message),
        Err(err) => {
            printer.failure(&err);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli, apis: &AwsApis) -> Result<String, ProvisionError> {
    match &cli.command {
        Commands::Create(args) => run_endpoint(apis, &endpoint_config(&cli.region, args)),
        Commands::Install(args) => run_endpoint(apis, &install_config(&cli.region, args)),
        Commands::Schedule { name, expression } => {
            let config = ProvisioningConfig::for_function(name, &cli.region);
            provisioner(apis).create_schedule(&config, expression)?;
            Ok(format!("Schedule {expression} attached to {name}"))
        }
        Commands::Role(RoleCommands::List) => {
            let names = apis.role_names()?;
            let mut message = String::from("The following roles have been found:");
            for name in names {
                message.push_str("\n* ");
                message.push_str(&name);
            }
            Ok(message)
        }
        Commands::Role(RoleCommands::Create {
            name,
            r#type,
            policy_file,
        }) => {
            let policy = match policy_file {
                Some(path) => std::fs::read_to_string(path).map_err(|err| {
                    ProvisionError::Config(format!("could not read policy file {path}: {err}"))
                })?,
                None => r#type.policy().to_string(),
            };
            apis.create_role(name, &policy)?;
            Ok(format!("Role {name} created"))
        }
        Commands::Apikey(ApikeyCommands::List) => {
            let keys = apis.api_keys()?;
            let mut message = String::from("The following API keys have been found:");
            for (id, name) in keys {
                message.push_str(&format!("\n* {id} ({name})"));
            }
            Ok(message)
        }
        Commands::Apikey(ApikeyCommands::Create {
            keyname,
            description,
            enabled,
            api_id,
        }) => {
            let id = apis.create_api_key(keyname, description, *enabled, api_id.as_deref())?;
            Ok(format!("API key {keyname} created with id {id}"))
        }
    }
}

fn provisioner(apis: &AwsApis) -> Provisioner<'_> {
    Provisioner {
        compute: apis,
        gateway: apis,
        scheduler: apis,
        roles: apis,
    }
}

fn endpoint_config(region: &str, args: &CreateArgs) -> ProvisioningConfig {
    let mut config = ProvisioningConfig::for_function(&args.name, region);
    config.role_name = args.role.clone();
    config.code_source = args.file.clone();
    config.authentication = args.authentication.clone();
    config.api_key_required = args.apikey_required;
    config.runtime = args.runtime.clone();
    config.no_gateway = args.no_gateway;
    config
}

/// Self-hosting always fetches the published release bundle and keeps the
/// endpoint behind an API key.
fn install_config(region: &str, args: &InstallArgs) -> ProvisioningConfig {
    let mut config = ProvisioningConfig::for_function(&args.name, region);
    config.role_name = args.role.clone();
    config.code_source = Some(RELEASE_BUNDLE_URL.to_string());
    config.api_key_required = true;
    config.runtime = args.runtime.clone();
    config
}

fn run_endpoint(apis: &AwsApis, config: &ProvisioningConfig) -> Result<String, ProvisionError> {
    let outcome = provisioner(apis).create_endpoint(config)?;
    match outcome.gateway {
        Some(record) => {
            let mut message = format!("Your endpoint is available at {}", record.endpoint());
            if config.api_key_required {
                message.push_str(
                    "\nRequests need an API key; create one with `sluice apikey create`",
                );
            }
            Ok(message)
        }
        None => Ok(format!("Function {} is ready", outcome.function.name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_pins_the_release_bundle_and_requires_an_api_key() {
        let args = InstallArgs {
            name: "sluice".to_string(),
            role: Some("provisioner-role".to_string()),
            runtime: DEFAULT_RUNTIME.to_string(),
        };
        let config = install_config("eu-west-1", &args);

        assert_eq!(config.code_source.as_deref(), Some(RELEASE_BUNDLE_URL));
        assert!(config.has_remote_source());
        assert!(config.api_key_required);
        assert!(!config.no_gateway);
        assert_eq!(config.role_name.as_deref(), Some("provisioner-role"));
    }

    #[test]
    fn create_flags_map_onto_the_provisioning_config() {
        let args = CreateArgs {
            name: "Echo".to_string(),
            role: Some("basic-role".to_string()),
            file: Some("bundles/echo.zip".to_string()),
            authentication: "AWS_IAM".to_string(),
            apikey_required: true,
            runtime: "nodejs20.x".to_string(),
            no_gateway: true,
        };
        let config = endpoint_config("us-east-1", &args);

        assert_eq!(config.function_name, "Echo");
        assert_eq!(config.code_source.as_deref(), Some("bundles/echo.zip"));
        assert_eq!(config.authentication, "AWS_IAM");
        assert!(config.api_key_required);
        assert_eq!(config.runtime, "nodejs20.x");
        assert!(config.no_gateway);
    }
}
