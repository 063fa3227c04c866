use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use tracing_subscriber::EnvFilter;

use keggpull::domain::OrganismCode;
use keggpull::error::KeggError;
use keggpull::export::{ExportResult, Exporter, ProgressEvent, ProgressSink};
use keggpull::kegg::KeggHttpClient;

#[derive(Debug, Parser)]
#[command(name = "keggpull")]
#[command(about = "Export per-pathway reaction and compound ID lists for an organism from KEGG")]
#[command(version, author)]
struct Cli {
    /// KEGG organism code, e.g. hsa
    organism: String,

    /// Output path prefix; the containing directory must already exist
    prefix: String,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(cli_error_exit(&err));
        }
    };

    match run(cli) {
        Ok(result) => {
            print_summary(&result);
            if result.failed() > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            let code = map_exit_code(&err);
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}

/// Help and version requests surface as clap errors from `try_parse` but are
/// not usage mistakes; only the latter exit 1.
fn cli_error_exit(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn map_exit_code(error: &KeggError) -> u8 {
    match error {
        KeggError::KeggHttp(_) | KeggError::KeggStatus { .. } => 3,
        _ => 1,
    }
}

fn run(cli: Cli) -> Result<ExportResult, KeggError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let organism: OrganismCode = cli.organism.parse()?;
    let kegg = KeggHttpClient::new()?;
    let exporter = Exporter::new(kegg);
    exporter.export(&organism, &cli.prefix, &ConsoleTrace)
}

/// Echoes pathway references and raw compound references to stdout as they
/// are processed.
struct ConsoleTrace;

impl ProgressSink for ConsoleTrace {
    fn event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Pathway(id) => println!("{id}"),
            ProgressEvent::RawCompound(id) => println!("{id}"),
        }
    }
}

fn print_summary(result: &ExportResult) {
    let green = "\x1b[32m";
    let cyan = "\x1b[36m";
    let red = "\x1b[31m";
    let reset = "\x1b[0m";

    println!("{cyan}keggpull summary for {}{reset}", result.organism);
    println!("{green}exported pathways: {}{reset}", result.exported());
    if result.failed() > 0 {
        println!("{red}failed pathways: {}{reset}", result.failed());
    }

    for item in &result.items {
        match &item.outcome {
            Ok(files) => println!(
                "{green}  {} ({} compounds, {} reactions) -> {} {}{reset}",
                item.pathway,
                files.compound_count,
                files.reaction_count,
                files.compounds_file,
                files.reactions_file
            ),
            Err(err) => println!("{red}  {} failed: {err}{reset}", item.pathway),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_requires_exactly_two_arguments() {
        assert!(Cli::try_parse_from(["keggpull"]).is_err());
        assert!(Cli::try_parse_from(["keggpull", "hsa"]).is_err());
        assert!(Cli::try_parse_from(["keggpull", "hsa", "out/", "extra"]).is_err());

        let cli = Cli::try_parse_from(["keggpull", "hsa", "out/"]).unwrap();
        assert_eq!(cli.organism, "hsa");
        assert_eq!(cli.prefix, "out/");
    }

    #[test]
    fn help_and_version_exit_zero_usage_errors_exit_one() {
        let err = Cli::try_parse_from(["keggpull", "--help"]).unwrap_err();
        assert_eq!(cli_error_exit(&err), 0);
        let err = Cli::try_parse_from(["keggpull", "--version"]).unwrap_err();
        assert_eq!(cli_error_exit(&err), 0);
        let err = Cli::try_parse_from(["keggpull", "hsa", "out/", "extra"]).unwrap_err();
        assert_eq!(cli_error_exit(&err), 1);
    }

    #[test]
    fn transport_errors_map_to_exit_code_3() {
        assert_eq!(map_exit_code(&KeggError::KeggHttp("connect refused".to_string())), 3);
        assert_eq!(
            map_exit_code(&KeggError::KeggStatus {
                status: 503,
                message: "unavailable".to_string(),
            }),
            3
        );
        assert_eq!(
            map_exit_code(&KeggError::Parse {
                raw: "cpd:X99999".to_string(),
                expected: "cpd:C<5 digits>".to_string(),
            }),
            1
        );
        assert_eq!(map_exit_code(&KeggError::InvalidOrganism(String::new())), 1);
    }
}
