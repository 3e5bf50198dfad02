mod config;
mod error;

use std::process::ExitCode;

use can::{Ability, Context, Roles};
use clap::{Parser, Subcommand};
use tracing::{info_span, warn};
use tracing_subscriber::EnvFilter;

use config::RolesArgs;
use error::Result;

/// Exit code for a denied decision.
const DENIED: u8 = 2;

#[derive(Parser)]
#[command(name = "canctl")]
#[command(about = "Evaluate role-based access control decisions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a role may exercise an ability on a permission
    Check {
        #[command(flatten)]
        roles: RolesArgs,
        /// Role name
        #[arg(short, long)]
        role: String,
        /// Permission name, e.g. users or users_42
        #[arg(short, long)]
        permission: String,
        /// Requested ability (read, create, update, delete, all, skip)
        #[arg(short, long, value_parser = parse_ability)]
        ability: Ability,
        /// Result of the request-specific predicate; omitted means no predicate
        #[arg(long)]
        compare: Option<bool>,
    },
    /// Derive the permission and ability for a request
    Classify {
        /// HTTP method
        method: String,
        /// Request path
        path: String,
        /// Router-captured parameter values to strip from the path
        #[arg(long = "param")]
        params: Vec<String>,
    },
    /// Classify a request and check it against a role
    Authorize {
        #[command(flatten)]
        roles: RolesArgs,
        /// Role name
        #[arg(short, long)]
        role: String,
        /// HTTP method
        method: String,
        /// Request path
        path: String,
        /// Router-captured parameter values to strip from the path
        #[arg(long = "param")]
        params: Vec<String>,
        /// Result of the request-specific predicate; omitted means no predicate
        #[arg(long)]
        compare: Option<bool>,
    },
    /// Print the compiled roles as JSON
    Dump {
        #[command(flatten)]
        roles: RolesArgs,
    },
    /// Strictly compile a role config and summarize it
    Validate {
        /// Role config file (.yml, .yaml, .toml or .json)
        #[arg(short, long, env = "CANCTL_CONFIG")]
        config: std::path::PathBuf,
    },
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Check {
            roles,
            role,
            permission,
            ability,
            compare,
        } => {
            let roles = roles.load()?;
            Ok(report(check(&roles, &role, &permission, ability, compare)))
        }
        Commands::Classify {
            method,
            path,
            params,
        } => {
            let request = can::classify(&method, &path, &params);
            println!("permission: {}", request.permission);
            println!("ability: {}", request.ability);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Authorize {
            roles,
            role,
            method,
            path,
            params,
            compare,
        } => {
            let roles = roles.load()?;
            let request = can::classify(&method, &path, &params);
            println!("permission: {}", request.permission);
            println!("ability: {}", request.ability);
            Ok(report(check(
                &roles,
                &role,
                &request.permission,
                request.ability,
                compare,
            )))
        }
        Commands::Dump { roles } => {
            println!("{}", dump(&roles.load()?)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { config } => {
            let roles = can::load_strict(&config)?;
            println!("{}: {}", config.display(), summarize(&roles));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn parse_ability(value: &str) -> std::result::Result<Ability, String> {
    Ability::try_parse(value).ok_or_else(|| format!("unknown ability '{value}'"))
}

fn check(
    roles: &Roles,
    role: &str,
    permission: &str,
    ability: Ability,
    compare: Option<bool>,
) -> bool {
    let span = info_span!("check", role);
    let ctx = Context::new().with_span(span).with_value("role", role);

    let Some(granted) = roles.get(role) else {
        warn!(role, "role is not defined");
        return false;
    };
    let predicate = compare.map(|answer| move || answer);

    can::can(
        &ctx,
        Some(granted),
        permission,
        ability,
        predicate.as_ref().map(|p| p as &dyn Fn() -> bool),
    )
}

fn report(allowed: bool) -> ExitCode {
    if allowed {
        println!("allow");
        ExitCode::SUCCESS
    } else {
        println!("deny");
        ExitCode::from(DENIED)
    }
}

fn dump(roles: &Roles) -> Result<String> {
    // Going through `Value` sorts map keys.
    let value = serde_json::to_value(roles)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

fn summarize(roles: &Roles) -> String {
    let keys: usize = roles.iter().map(|(_, role)| role.len()).sum();
    format!("{} roles, {keys} permission keys", roles.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    fn roles() -> Roles {
        can::loader::from_str(
            r#"
admin:
  users:
    abilities: [all]
user:
  users:
    abilities: [read]
    routes: [me]
"#,
            can::Format::Yaml,
        )
        .unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_check_arguments() {
        let cli = Cli::try_parse_from([
            "canctl", "check", "-c", "rbac.yml", "-r", "user", "-p", "users", "-a", "READ",
            "--compare", "true",
        ])
        .unwrap();

        match cli.command {
            Commands::Check {
                roles,
                ability,
                compare,
                ..
            } => {
                assert_eq!(roles.config, std::path::PathBuf::from("rbac.yml"));
                assert!(!roles.strict);
                assert_eq!(ability, Ability::Read);
                assert_eq!(compare, Some(true));
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn rejects_unknown_ability_argument() {
        let result = Cli::try_parse_from([
            "canctl", "check", "-c", "rbac.yml", "-r", "user", "-p", "users", "-a", "manage",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn check_follows_engine() {
        let roles = roles();
        assert!(check(&roles, "admin", "users", Ability::Delete, None));
        assert!(check(&roles, "user", "users_me", Ability::Read, Some(true)));
        assert!(!check(&roles, "user", "users", Ability::Read, Some(false)));
        assert!(!check(&roles, "user", "users", Ability::Read, None));
        assert!(!check(&roles, "guest", "users", Ability::Read, Some(true)));
    }

    #[test]
    fn dump_is_sorted_json() {
        let rendered = dump(&roles()).unwrap();
        let admin = rendered.find("\"admin\"").unwrap();
        let user = rendered.find("\"user\"").unwrap();
        assert!(admin < user);
        assert!(rendered.contains("\"users_me\""));
    }

    #[test]
    fn summarize_counts_keys() {
        assert_eq!(summarize(&roles()), "2 roles, 3 permission keys");
    }

    #[test]
    fn strict_flag_rejects_bad_config() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "user:\n  users:\n    abilities: [raed]").unwrap();

        let args = RolesArgs {
            config: file.path().to_path_buf(),
            strict: true,
        };
        assert!(args.load().is_err());

        let args = RolesArgs {
            strict: false,
            ..args
        };
        let roles = args.load().unwrap();
        assert!(!check(&roles, "user", "users", Ability::Read, Some(true)));
    }
}
