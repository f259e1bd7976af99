// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! loadprobe CLI - Script Loader Diagnostics
//!
//! Runs the probe against a fetched page or a hand-described document.

use std::env;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use loadprobe::{
    CapturedConsole, Dispatch, FramePosition, PageHostConfig, PageLoader, Probe, ProbeConfig,
    ProbeOutcome, ScriptElement, SnapshotHost, SnapshotHostBuilder,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("loadprobe=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "page" => {
            if args.len() < 3 {
                eprintln!("Usage: loadprobe page <url> [--script <pattern>]");
                return ExitCode::from(1);
            }
            probe_page(&args[2], &args[3..]).await
        }
        "snapshot" => {
            if args.len() < 3 {
                eprintln!("Usage: loadprobe snapshot <document-url> [OPTIONS]");
                return ExitCode::from(1);
            }
            probe_snapshot(&args[2], &args[3..]).await
        }
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("loadprobe {}", loadprobe::VERSION);
            return ExitCode::SUCCESS;
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"loadprobe - Script Loader Diagnostics

USAGE:
    loadprobe <COMMAND> [OPTIONS]

COMMANDS:
    page <url>                Fetch a page and diagnose one of its scripts
    snapshot <document-url>   Diagnose a hand-described document
    help                      Show this help message
    version                   Show version information

PAGE OPTIONS:
    --script <pattern>        Treat the first script whose src contains <pattern>
                              as the loading tag (omit for a dynamic load)

SNAPSHOT OPTIONS:
    --src <url>               Loading tag src
    --type <type>             Loading tag type attribute
    --attr <name>=<value>     Extra loading tag attribute (repeatable)
    --inline                  Loading tag is an inline script

COMMON OPTIONS:
    --stack-file <path>       Stack trace text returned by the forced trace
    --base <url>              Document base URI
    --top <url>               Embed under a top-level document at <url>
    --top-blocked             Embedded, top-level location unreadable
    --opaque                  Embedded, top-level window unreachable
    --endpoint <url>          Ambient delivery endpoint (default: $SCRIPT_DIAG_ENDPOINT)
    --no-deliver              Never relay the report

EXAMPLES:
    loadprobe page https://example.com --script loader.js
    loadprobe snapshot "https://app.example/?theme=dark#x=1"
    loadprobe snapshot https://app.example/ --stack-file trace.txt --top https://portal.example/
"#
    );
}

/// Parsed command-line options
#[derive(Debug, Default)]
struct Options {
    script: Option<String>,
    src: Option<String>,
    script_type: Option<String>,
    attrs: Vec<(String, String)>,
    inline: bool,
    stack_file: Option<String>,
    base: Option<String>,
    frame: Option<FramePosition>,
    endpoint: Option<String>,
    no_deliver: bool,
}

impl Options {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut opts = Options::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = |name: &str| {
                iter.next()
                    .cloned()
                    .ok_or_else(|| anyhow!("{} requires a value", name))
            };

            match arg.as_str() {
                "--script" => opts.script = Some(value("--script")?),
                "--src" => opts.src = Some(value("--src")?),
                "--type" => opts.script_type = Some(value("--type")?),
                "--attr" => {
                    let raw = value("--attr")?;
                    let (name, val) = raw.split_once('=').unwrap_or((raw.as_str(), ""));
                    opts.attrs.push((name.to_string(), val.to_string()));
                }
                "--inline" => opts.inline = true,
                "--stack-file" => opts.stack_file = Some(value("--stack-file")?),
                "--base" => opts.base = Some(value("--base")?),
                "--top" => {
                    opts.frame = Some(FramePosition::Nested {
                        top_location: Some(value("--top")?),
                    })
                }
                "--top-blocked" => opts.frame = Some(FramePosition::Nested { top_location: None }),
                "--opaque" => opts.frame = Some(FramePosition::Opaque),
                "--endpoint" => opts.endpoint = Some(value("--endpoint")?),
                "--no-deliver" => opts.no_deliver = true,
                other => bail!("Unknown option: {}", other),
            }
        }

        Ok(opts)
    }

    fn probe_config(&self) -> ProbeConfig {
        let mut config = ProbeConfig::from_env();
        if let Some(ref endpoint) = self.endpoint {
            config = config.ambient_endpoint(endpoint.clone());
        }
        config.delivery_enabled(!self.no_deliver)
    }

    /// Apply the options every command shares
    fn apply_common(&self, mut builder: SnapshotHostBuilder) -> anyhow::Result<SnapshotHostBuilder> {
        if let Some(ref path) = self.stack_file {
            builder = builder
                .stack_trace_file(path)
                .with_context(|| format!("reading stack trace from {}", path))?;
        }
        if let Some(ref base) = self.base {
            builder = builder.base_uri(base.clone());
        }
        if let Some(ref frame) = self.frame {
            builder = builder.frame(frame.clone());
        }
        Ok(builder)
    }

    fn script_element(&self) -> Option<ScriptElement> {
        let mut element = match (&self.src, self.inline) {
            (Some(src), _) => ScriptElement::external(src.clone()),
            (None, true) => ScriptElement::inline(),
            (None, false) if self.script_type.is_some() || !self.attrs.is_empty() => {
                ScriptElement::inline()
            }
            (None, false) => return None,
        };
        if let Some(ref t) = self.script_type {
            element = element.with_type(t.clone());
        }
        for (name, value) in &self.attrs {
            element = element.with_attribute(name.clone(), value.clone());
        }
        Some(element)
    }
}

async fn probe_page(url: &str, args: &[String]) -> anyhow::Result<()> {
    let opts = Options::parse(args)?;
    let config = opts.probe_config();

    let loader = PageLoader::new(&PageHostConfig::default().user_agent(config.user_agent.clone()))?;
    let page = loader.load(url).await?;

    eprintln!("Scripts on {} ({}):", page.url, page.scripts.len());
    for script in &page.scripts {
        eprintln!(
            "  - {} [{}]",
            script.location().unwrap_or("(inline)"),
            script.kind().as_str()
        );
    }

    let builder = page.host(opts.script.as_deref())?;
    run(opts.apply_common(builder)?, config).await
}

async fn probe_snapshot(document_url: &str, args: &[String]) -> anyhow::Result<()> {
    let opts = Options::parse(args)?;
    let config = opts.probe_config();

    let mut builder = SnapshotHost::builder(document_url);
    if let Some(script) = opts.script_element() {
        builder = builder.current_script(script);
    }

    run(opts.apply_common(builder)?, config).await
}

async fn run(builder: SnapshotHostBuilder, config: ProbeConfig) -> anyhow::Result<()> {
    let console = CapturedConsole::new();
    let host = builder.console(console.clone()).build();
    let timeout = config.delivery_timeout;

    let ProbeOutcome { report, dispatch } = Probe::new(config).run(&host);

    for message in console.messages() {
        if !message.message.is_empty() {
            eprintln!("{}{}", "  ".repeat(message.depth), message.message);
        }
    }

    println!("{}", report.to_json_pretty()?);

    match dispatch {
        Dispatch::Skipped => eprintln!("Delivery: skipped (no endpoint)"),
        Dispatch::Beacon { endpoint } => eprintln!("Delivery: beacon -> {}", endpoint),
        Dispatch::Dropped { endpoint, reason } => {
            eprintln!("Delivery: dropped -> {} ({})", endpoint, reason)
        }
        Dispatch::Fetch { endpoint, task } => {
            // The process is about to exit; give the POST a chance to leave
            match tokio::time::timeout(timeout, task).await {
                Ok(_) => eprintln!("Delivery: POST -> {}", endpoint),
                Err(_) => eprintln!("Delivery: POST -> {} (timed out)", endpoint),
            }
        }
    }

    Ok(())
}
