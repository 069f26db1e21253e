use std::env;
use std::net::SocketAddr;

use contracts::{CastRequest, LostItemQuery, NumerologyQuery, Scheme, SyllabusConfig};
use serde::Serialize;
use syllabus_api::{serve, OracleApi};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("syllabus <command>");
    println!("commands:");
    println!("  lost-item <item> <date> [seeker] [scheme]");
    println!("  numerology <name> <date> [scheme]");
    println!("    scheme: pythagorean (default) | chaldean");
    println!("  cast <seed> <intent...>");
    println!("    runs a reproducible charm cast and prints the placements");
    println!("  logs [module]");
    println!("    module: LOST_ITEM | NUMEROLOGY | CHARM_CASTING");
    println!("  status");
    println!("  serve [addr]");
    println!("    default addr: 127.0.0.1:8080");
    println!("env: SYLLABUS_SQLITE_PATH, SYLLABUS_BOARD_SIZE, SYLLABUS_NARRATIVE_MODEL,");
    println!("     SYLLABUS_NARRATIVE_ENDPOINT, SYLLABUS_LOG");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SYLLABUS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn required<'a>(args: &'a [String], index: usize, label: &str) -> Result<&'a str, String> {
    args.get(index)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| format!("missing {label}"))
}

fn parse_scheme(value: Option<&String>) -> Result<Scheme, String> {
    match value {
        Some(raw) => raw.parse::<Scheme>().map_err(|err| err.to_string()),
        None => Ok(Scheme::default()),
    }
}

fn parse_seed(value: Option<&String>) -> Result<u64, String> {
    let raw = value.ok_or_else(|| "missing seed".to_string())?;
    raw.parse::<u64>()
        .map_err(|_| format!("invalid seed: {raw}"))
}

fn parse_socket_addr(value: Option<&String>) -> Result<SocketAddr, String> {
    let raw = value.map(String::as_str).unwrap_or("127.0.0.1:8080");
    raw.parse::<SocketAddr>()
        .map_err(|_| format!("invalid addr: {raw}"))
}

fn lost_item_query(args: &[String]) -> Result<LostItemQuery, String> {
    Ok(LostItemQuery {
        item_name: required(args, 2, "item")?.to_string(),
        date_lost: required(args, 3, "date")?.to_string(),
        seeker_name: args.get(4).cloned().unwrap_or_default(),
        scheme: parse_scheme(args.get(5))?,
    })
}

fn numerology_query(args: &[String]) -> Result<NumerologyQuery, String> {
    Ok(NumerologyQuery {
        name: required(args, 2, "name")?.to_string(),
        birth_date: required(args, 3, "date")?.to_string(),
        scheme: parse_scheme(args.get(4))?,
    })
}

fn cast_request(args: &[String]) -> Result<CastRequest, String> {
    let seed = parse_seed(args.get(2))?;
    let intent = args.get(3..).unwrap_or_default().join(" ");
    if intent.trim().is_empty() {
        return Err("missing intent".to_string());
    }
    Ok(CastRequest {
        intent,
        seed: Some(seed),
    })
}

fn usage_error(err: String) -> ! {
    eprintln!("error: {err}");
    print_usage();
    std::process::exit(2);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => {
            eprintln!("failed to encode output: {err}");
            std::process::exit(1);
        }
    }
}

fn open_api(config: SyllabusConfig) -> OracleApi {
    let sqlite_path = config.sqlite_path.clone();
    let mut api = OracleApi::from_config(config);
    if let Err(err) = api.attach_sqlite_store(&sqlite_path) {
        warn!(sqlite_path = %sqlite_path, error = %err, "calculation log unavailable");
    }
    api
}

fn report_persistence(api: &OracleApi) {
    if let Some(error) = api.last_persistence_error() {
        eprintln!("warning: calculation was not logged: {error}");
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str);

    let config = match SyllabusConfig::from_env() {
        Ok(config) => config,
        Err(err) => usage_error(err.to_string()),
    };

    match command {
        Some("lost-item") => {
            let query = lost_item_query(&args).unwrap_or_else(|err| usage_error(err));
            let mut api = open_api(config);
            let result = api.lost_item(&query);
            print_json(&result);
            report_persistence(&api);
        }
        Some("numerology") => {
            let query = numerology_query(&args).unwrap_or_else(|err| usage_error(err));
            let mut api = open_api(config);
            let report = api.numerology(&query).await;
            print_json(&report);
            report_persistence(&api);
        }
        Some("cast") => {
            let request = cast_request(&args).unwrap_or_else(|err| usage_error(err));
            let mut api = open_api(config);
            match api.cast_charms(&request).await {
                Ok(report) => {
                    for placement in &report.placements {
                        println!(
                            "{} {:<10} {:>7.1},{:>7.1}  {}",
                            placement.icon, placement.name, placement.x, placement.y,
                            placement.zone_label
                        );
                    }
                    println!(
                        "seed={} steps={} landings={}",
                        report.seed, report.steps, report.landings
                    );
                    if let Some(reading) = &report.reading {
                        println!();
                        println!("{}", reading.synthesis);
                        println!("key insight: {}", reading.key_insight);
                    }
                    report_persistence(&api);
                }
                Err(err) => {
                    eprintln!("cast failed: {err}");
                    std::process::exit(1);
                }
            }
        }
        Some("logs") => {
            let api = open_api(config);
            let module = args.get(2).map(|module| module.to_ascii_uppercase());
            match api.logs(module.as_deref()) {
                Ok(entries) => {
                    for entry in entries {
                        println!(
                            "#{} {} {:<13} {}",
                            entry.id, entry.timestamp, entry.module, entry.query
                        );
                    }
                }
                Err(err) => {
                    eprintln!("failed to read logs: {err}");
                    std::process::exit(1);
                }
            }
        }
        Some("status") => {
            let api = open_api(config);
            println!("{}", api.status());
        }
        Some("serve") => match parse_socket_addr(args.get(2)) {
            Ok(addr) => {
                println!("serving api on http://{addr}");
                if let Err(err) = serve(addr, config).await {
                    eprintln!("server error: {err}");
                    std::process::exit(1);
                }
            }
            Err(err) => usage_error(err),
        },
        _ => {
            print_usage();
        }
    }
}
