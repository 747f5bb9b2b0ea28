use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Args;

use beautify::ast::display::{dump_module, DumpStyle};
use beautify::diagnostic::Diagnostic;
use beautify::passes::DepthAnnotation;
use beautify::Pipeline;

use super::{fail, load_and_parse, parse_passes_arg};

#[derive(Args)]
pub struct DumpArgs {
    /// Input program
    pub input: PathBuf,
    /// Annotate statement depths before dumping
    #[arg(long)]
    pub annotate: bool,
    /// Run these passes (comma-separated) before dumping
    #[arg(long, value_name = "LIST")]
    pub passes: Option<String>,
    /// Disable ANSI colours
    #[arg(long)]
    pub no_color: bool,
}

pub fn cmd_dump(args: DumpArgs) {
    let (source, mut module) = load_and_parse(&args.input);

    if let Some(passes) = parse_passes_arg(args.passes.as_deref()) {
        if let Err(e) = Pipeline::new(passes).run(&mut module) {
            fail(Diagnostic::from(e), &args.input, &source);
        }
    }

    let depth = args.annotate.then(|| DepthAnnotation::annotate(&module));
    let style = if args.no_color || !std::io::stdout().is_terminal() {
        DumpStyle::Plain
    } else {
        DumpStyle::Color
    };
    print!("{}", dump_module(&module, depth.as_ref(), style));
}
