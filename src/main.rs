use anyhow::{Context, Result};
use std::path::PathBuf;

use gadget_report::logging::{info, obj, v_num, v_str, Domain};
use gadget_report::{Config, JiraClient, MemoryPage, Orchestrator};

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  gadget-report watch <page.json> [out.json]   poll a dashboard snapshot until idle");
    eprintln!("  gadget-report render <selector>              print one report table");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        print_usage();
        std::process::exit(1);
    }

    let cfg = Config::from_env();
    info(
        Domain::System,
        "startup",
        obj(&[
            ("command", v_str(&args[1])),
            ("tracker", v_str(&cfg.tracker_base)),
            ("project", v_str(&cfg.project)),
        ]),
    );
    let client = JiraClient::new(cfg.clone()).context("TRACKER_BASE is not a valid URL")?;
    let orchestrator = Orchestrator::new(client, &cfg);

    match args[1].as_str() {
        "render" => {
            let markup = orchestrator.build_report(&args[2]).await?;
            println!("{}", markup);
        }
        "watch" => {
            let path = PathBuf::from(&args[2]);
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let mut page = MemoryPage::from_json(&text)
                .with_context(|| format!("parsing {}", path.display()))?;

            let mut orchestrator = orchestrator;
            let summary = orchestrator.run(&mut page).await;
            info(
                Domain::System,
                "shutdown",
                obj(&[
                    ("scans", v_num(summary.scans as f64)),
                    ("populated", v_num(summary.populated as f64)),
                    ("failed", v_num(summary.failed as f64)),
                ]),
            );

            let out = page.to_json()?;
            match args.get(3) {
                Some(dest) => std::fs::write(dest, out).with_context(|| format!("writing {}", dest))?,
                None => println!("{}", out),
            }
        }
        _ => {
            print_usage();
            std::process::exit(1);
        }
    }
    Ok(())
}
