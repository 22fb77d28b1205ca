use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use vigil_core::{FilesConfig, GateConfig, VerdictStatus, REQUIRED_VARS};
use vigil_review::github::GitHubClient;
use vigil_review::llm::LlmClient;
use vigil_review::pipeline::ReviewPipeline;
use vigil_review::report::ReviewReport;
use vigil_review::{collect, status};

#[derive(Parser)]
#[command(
    name = "vigil",
    version,
    about = "AI review gate for CI",
    long_about = "Vigil reviews the changed files of a pull request with a hosted LLM and\n\
                   gates the merge on the aggregated verdict.\n\n\
                   Each changed file is sent to the model individually; the per-file verdicts\n\
                   are combined into one status, posted back to the PR as a comment, and\n\
                   written to a status file for downstream pipeline steps.\n\n\
                   Examples:\n  \
                     vigil check                     Review the files listed in changed_files.txt\n  \
                     vigil check --changed-files f   Review a different change list\n  \
                     vigil doctor                    Check required environment variables\n  \
                     vigil init                      Create a default .vigil.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .vigil.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Review the changed files and gate the merge on the verdict
    #[command(long_about = "Review the changed files and gate the merge on the verdict.\n\n\
        Reads the newline-delimited change list, filters to recognized source files,\n\
        sends each file to the model sequentially, posts one summary comment to the\n\
        PR, and writes the overall status to the status file.\n\n\
        Exit code is 0 when the overall status is APPROVED (including the empty\n\
        \"nothing to review\" case) and 1 when it is NEEDS_CHANGES.")]
    Check {
        /// Override the changed-file list path
        #[arg(long)]
        changed_files: Option<PathBuf>,

        /// Override the status file path
        #[arg(long)]
        status_file: Option<PathBuf>,
    },
    /// Check your Vigil setup and environment
    #[command(long_about = "Check your Vigil setup and environment.\n\n\
        Runs diagnostics for each required environment variable, the optional\n\
        .vigil.toml configuration file, and the changed-file list.")]
    Doctor,
    /// Create a default .vigil.toml configuration file
    #[command(long_about = "Create a default .vigil.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .vigil.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");

    println!("vigil v{version} — AI review gate for CI\n");

    println!("Quick start:");
    println!("  vigil init      Create a .vigil.toml config file");
    println!("  vigil doctor    Check required environment variables");
    println!("  vigil check     Review changed files and gate the merge\n");

    println!("Run 'vigil <command> --help' for details.");
}

fn load_files_config(config_path: Option<&Path>) -> Result<FilesConfig> {
    match config_path {
        Some(path) => Ok(FilesConfig::from_file(path)?),
        None => {
            let default_path = Path::new(".vigil.toml");
            if default_path.exists() {
                Ok(FilesConfig::from_file(default_path)?)
            } else {
                Ok(FilesConfig::default())
            }
        }
    }
}

async fn run_check(config: &GateConfig) -> Result<VerdictStatus> {
    println!("{:=<60}", "");
    println!("Vigil AI Review Gate - Starting Analysis");
    println!("{:=<60}", "");

    let changed = collect::read_changed_list(&config.files.changed_list)?;
    if changed.is_empty() {
        println!("No files changed in this PR");
    } else {
        println!("\nFound {} changed file(s)", changed.len());
    }
    let eligible = collect::filter_eligible(&changed);

    let llm = LlmClient::new(&config.llm)?;
    let pipeline = ReviewPipeline::new(llm, config.files.max_content_chars);
    let reviews = pipeline.review_files(&eligible).await;

    let report = ReviewReport::new(reviews);
    let overall = report.overall();

    println!("\n{:=<60}", "");
    println!("Generating PR comment...");
    println!("{:=<60}", "");

    let github = GitHubClient::new(&config.github);
    match github
        .post_pr_comment(&config.github.repo, config.github.pr_number, &report.to_markdown())
        .await
    {
        Ok(()) => println!("\u{2713} Comment posted successfully"),
        Err(e) => println!("\u{2717} Failed to post comment: {e}"),
    }

    status::write_status(&config.files.status_file, overall)?;

    println!("\n{:=<60}", "");
    println!("Final Status: {overall}");
    println!("{:=<60}", "");

    Ok(overall)
}

struct CheckResult {
    name: &'static str,
    status: &'static str,
    detail: String,
    hint: Option<String>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "pass",
            detail: detail.into(),
            hint: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: "fail",
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }

    fn info(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "info",
            detail: detail.into(),
            hint: None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            "pass" => "\u{2713}",
            "fail" => "\u{2717}",
            _ => "~",
        }
    }
}

fn run_doctor(config_path: Option<&Path>) {
    let mut checks: Vec<CheckResult> = Vec::new();

    // 1. Required environment variables (values are never printed)
    for &var in REQUIRED_VARS {
        match std::env::var(var) {
            Ok(value) if !value.is_empty() => {
                if var == "PR_NUMBER" && value.trim().parse::<u64>().is_err() {
                    checks.push(CheckResult::fail(
                        var,
                        "set but not a number",
                        "PR_NUMBER must be the numeric pull request id",
                    ));
                } else {
                    checks.push(CheckResult::pass(var, "set"));
                }
            }
            _ => checks.push(CheckResult::fail(
                var,
                "not set",
                format!("export {var}=..."),
            )),
        }
    }

    // 2. Config file
    let config_file = config_path.unwrap_or(Path::new(".vigil.toml"));
    if config_file.exists() {
        match FilesConfig::from_file(config_file) {
            Ok(_) => checks.push(CheckResult::pass(
                "config_file",
                format!("{} found", config_file.display()),
            )),
            Err(e) => checks.push(CheckResult::fail(
                "config_file",
                format!("{} is invalid: {e}", config_file.display()),
                "fix the TOML or delete the file to use defaults",
            )),
        }
    } else {
        checks.push(CheckResult::info(
            "config_file",
            format!(
                "{} not found (defaults in effect; run 'vigil init' to create)",
                config_file.display()
            ),
        ));
    }

    // 3. Changed-file list
    let files = FilesConfig::from_file(config_file).unwrap_or_default();
    match collect::read_changed_list(&files.changed_list) {
        Ok(list) if list.is_empty() => checks.push(CheckResult::info(
            "changed_files",
            format!(
                "{} absent or empty (treated as no files changed)",
                files.changed_list.display()
            ),
        )),
        Ok(list) => checks.push(CheckResult::pass(
            "changed_files",
            format!("{} file(s) listed", list.len()),
        )),
        Err(e) => checks.push(CheckResult::fail(
            "changed_files",
            format!("unreadable: {e}"),
            "check permissions on the change list",
        )),
    }

    let version = env!("CARGO_PKG_VERSION");
    println!("Vigil v{version} — Environment Check\n");

    for check in &checks {
        let label = check.name.to_lowercase().replace('_', " ");
        println!("  {} {label:<26} {}", check.symbol(), check.detail);
        if let Some(hint) = &check.hint {
            println!("    hint: {hint}");
        }
    }

    let passed = checks.iter().filter(|c| c.status == "pass").count();
    let failed = checks.iter().filter(|c| c.status == "fail").count();
    let info = checks.iter().filter(|c| c.status == "info").count();
    println!("\n{passed} checks passed, {failed} failed, {info} info");
}

const DEFAULT_CONFIG: &str = r#"# Vigil Configuration
# Credentials and PR coordinates always come from the environment:
#   AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_KEY, AZURE_OPENAI_DEPLOYMENT,
#   GITHUB_TOKEN, PR_NUMBER, REPO_NAME

[files]
# changed_list = "changed_files.txt"
# status_file = "approval_status.txt"
# max_content_chars = 10000
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    match cli.command {
        None => {
            print_welcome();
        }
        Some(Command::Check {
            changed_files,
            status_file,
        }) => {
            // Required environment first: a missing variable aborts before
            // any file is read or any network call is made.
            let mut config =
                GateConfig::from_env()?.with_files(load_files_config(cli.config.as_deref())?);
            if let Some(path) = changed_files {
                config.files.changed_list = path;
            }
            if let Some(path) = status_file {
                config.files.status_file = path;
            }

            let overall = run_check(&config).await?;
            if overall == VerdictStatus::NeedsChanges {
                println!("\n\u{26a0} Exiting with error code (issues found)");
                std::process::exit(1);
            }
            println!("\n\u{2713} All checks passed!");
        }
        Some(Command::Doctor) => {
            run_doctor(cli.config.as_deref());
        }
        Some(Command::Init) => {
            let path = Path::new(".vigil.toml");
            if path.exists() {
                miette::bail!(".vigil.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .vigil.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "vigil", &mut std::io::stdout());
        }
    }

    Ok(())
}
