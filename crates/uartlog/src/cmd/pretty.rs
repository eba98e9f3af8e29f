use std::path::Path;

use tracing::warn;
use uartlog_pretty::{process_file, PrettyConfig, RenderOptions};

use crate::cmd::PrettyArgs;
use crate::exit::{pretty_error, CliResult, SUCCESS};
use crate::output::{print_pretty_outcome, print_pretty_summary, OutputFormat, PrettyOutcome};

pub fn run(args: PrettyArgs, format: OutputFormat) -> CliResult<i32> {
    let config = PrettyConfig {
        scheme: args.scheme.map(Into::into),
        render: RenderOptions {
            trim_last_field: args.trim_last_field,
            strip_envelope: args.strip_envelope,
        },
        compress: !args.no_compress,
    };

    let mut code = SUCCESS;
    let mut outcomes = Vec::with_capacity(args.files.len());

    for arg in &args.files {
        let path = Path::new(arg);
        let outcome = if !path.is_file() {
            code = code.max(crate::exit::FAILURE);
            PrettyOutcome::skipped(arg)
        } else {
            match process_file(path, &config) {
                Ok(report) => PrettyOutcome::written(&report.input, &report.output, report.lines),
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "pretty-print failed");
                    code = code.max(pretty_error(&err));
                    PrettyOutcome::failed(path, err.to_string())
                }
            }
        };
        print_pretty_outcome(&outcome, format);
        outcomes.push(outcome);
    }

    print_pretty_summary(&outcomes, format);
    Ok(code)
}
