//! Build tasks for livestyle

use std::env;
use std::path::PathBuf;
use std::process::{Command, ExitCode};

use facet::Facet;
use facet_args as args;
use livestyle_config::BuildDefaults;
use owo_colors::OwoColorize;

const CLIENT_CRATE: &str = "crates/livestyle-client";

/// WASM command - build the injected client
#[derive(Facet, Debug)]
struct WasmArgs {
    /// Build in release mode
    #[facet(args::named, args::short = 'r')]
    release: bool,
}

/// Browser test command - run the client's wasm-bindgen tests headless
#[derive(Facet, Debug)]
struct TestBrowserArgs {
    /// Browser to drive (chrome or firefox)
    #[facet(args::named, default)]
    browser: Option<String>,
}

/// Defaults command - write the build defaults table as JSON
#[derive(Facet, Debug)]
struct DefaultsArgs {
    /// Output path (stdout when omitted)
    #[facet(args::positional, default)]
    output_path: Option<String>,
}

#[derive(Facet, Debug)]
#[repr(u8)]
enum XtaskCommand {
    /// Build the WASM client
    Wasm(WasmArgs),
    /// Run browser tests for the WASM client
    TestBrowser(TestBrowserArgs),
    /// Export the build defaults table
    Defaults(DefaultsArgs),
}

#[derive(Facet, Debug)]
struct XtaskArgs {
    #[facet(args::subcommand)]
    command: XtaskCommand,
}

fn parse_args() -> Result<XtaskCommand, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let args_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();

    let parsed: XtaskArgs = facet_args::from_slice(&args_refs).map_err(|e| {
        eprintln!("{:?}", miette::Report::new(e));
        "Failed to parse arguments".to_string()
    })?;

    Ok(parsed.command)
}

fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .build(),
        )
    }))
    .ok();

    let cmd = match parse_args() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let ok = match cmd {
        XtaskCommand::Wasm(args) => build_wasm(args.release),
        XtaskCommand::TestBrowser(args) => {
            test_browser(args.browser.as_deref().unwrap_or("chrome"))
        }
        XtaskCommand::Defaults(args) => write_defaults(args.output_path.map(PathBuf::from)),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_wasm(release: bool) -> bool {
    eprintln!("Building livestyle-client WASM...");

    let mut cmd = Command::new("wasm-pack");
    cmd.args(["build", "--target", "web"]);
    cmd.arg(if release { "--release" } else { "--dev" });
    cmd.arg(CLIENT_CRATE);

    run_wasm_pack(cmd, "WASM build complete")
}

fn test_browser(browser: &str) -> bool {
    let flag = match browser {
        "chrome" => "--chrome",
        "firefox" => "--firefox",
        other => {
            eprintln!(
                "{}: unsupported browser {other:?} (expected chrome or firefox)",
                "error".red().bold()
            );
            return false;
        }
    };

    eprintln!("Running livestyle-client browser tests in {browser}...");

    let mut cmd = Command::new("wasm-pack");
    cmd.args(["test", "--headless", flag, CLIENT_CRATE]);

    run_wasm_pack(cmd, "Browser tests passed")
}

fn run_wasm_pack(mut cmd: Command, success: &str) -> bool {
    match cmd.status() {
        Ok(s) if s.success() => {
            eprintln!("{}", success.green());
            true
        }
        Ok(s) => {
            eprintln!("wasm-pack failed with status: {s}");
            false
        }
        Err(e) => {
            eprintln!("Failed to run wasm-pack: {e}");
            eprintln!("Install with: cargo install wasm-pack");
            false
        }
    }
}

fn write_defaults(output_path: Option<PathBuf>) -> bool {
    let json = match BuildDefaults::resolve(None).to_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            return false;
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs_err::write(&path, format!("{json}\n")) {
                eprintln!("{}: {e}", "error".red().bold());
                return false;
            }
            eprintln!("Wrote build defaults to {}", path.display());
        }
        None => println!("{json}"),
    }
    true
}
