//! Command-line front end over the pool model: create and inspect pools,
//! manage participants and contributions, and move snapshots around as
//! files or smart links.

use std::{env, fs, process};

use chrono::{DateTime, Utc};
use pool_store::{CreatePool, JsonFileStore, PoolController, StoreError};
use pool_types::{Pool, Selection, ShareMode};
use share_engine::{compute_shares, validate_pool};
use snapshot_codec::{
    agreement_digest, build_smart_link, export_pool, import_link_pool, import_pool,
    unpack_smart_link_data, LinkError,
};
use thiserror::Error;

const DEFAULT_STATE_FILE: &str = "pools.json";
const DEFAULT_ORIGIN: &str = "https://powerball.ru";

#[derive(Debug, Error)]
enum AppError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("pool {0} not found")]
    NotFound(String),
    #[error("invalid draw date {0:?} (expected RFC 3339, e.g. 2026-09-05T20:00:00Z)")]
    BadDrawDate(String),
    #[error("file was not a valid pool export")]
    BadImport,
    #[error("share link rejected ({})", .0.code())]
    Link(#[from] LinkError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("poolctl failed: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let state_path =
        env::var("POOLCTL_STATE").unwrap_or_else(|_| DEFAULT_STATE_FILE.to_string());
    let controller = PoolController::new(JsonFileStore::new(state_path));

    let args: Vec<String> = env::args().skip(1).collect();
    let mut args = args.iter().map(String::as_str);
    match args.next() {
        Some("create") => {
            let name = args
                .next()
                .ok_or(AppError::Usage("poolctl create <name> [draw-date-rfc3339]"))?;
            let draw_date = match args.next() {
                Some(raw) => parse_draw_date(raw)?,
                None => Utc::now(),
            };
            let mut pool = controller.create(CreatePool {
                name: name.to_string(),
                draw_date,
                price_per: None,
                initial_tickets: None,
            })?;
            let mut rng = rand::thread_rng();
            controller.set_tickets(&mut pool, vec![Selection::random(&mut rng)])?;
            println!("created pool {}", pool.id);
        }
        Some("list") => {
            for pool in controller.list() {
                println!(
                    "{}  {}  tickets={} participants={} updated={}",
                    pool.id,
                    pool.name,
                    pool.tickets.len(),
                    pool.participants.len(),
                    pool.updated_at.to_rfc3339()
                );
            }
        }
        Some("show") => {
            let pool = fetch(&controller, args.next())?;
            println!("{}", serde_json::to_string_pretty(&pool)?);
        }
        Some("add-participant") => {
            let mut pool = fetch(&controller, args.next())?;
            let name = args
                .next()
                .ok_or(AppError::Usage("poolctl add-participant <pool-id> <name>"))?;
            let id = controller.add_participant(&mut pool, name)?;
            println!("added participant {id}");
        }
        Some("contribute") => {
            let mut pool = fetch(&controller, args.next())?;
            let (participant, amount) = match (args.next(), args.next()) {
                (Some(p), Some(a)) => (p, a),
                _ => {
                    return Err(AppError::Usage(
                        "poolctl contribute <pool-id> <participant-id> <amount>",
                    ))
                }
            };
            let amount = amount.parse::<f64>().unwrap_or(0.0);
            controller.set_contribution_total(&mut pool, participant, amount)?;
            println!("contribution recorded");
        }
        Some("share-mode") => {
            let mut pool = fetch(&controller, args.next())?;
            let mode = match args.next() {
                Some("equal") => ShareMode::Equal,
                Some("byContrib") => ShareMode::ByContrib,
                Some("manual") => ShareMode::Manual,
                _ => {
                    return Err(AppError::Usage(
                        "poolctl share-mode <pool-id> equal|byContrib|manual",
                    ))
                }
            };
            controller.set_share_mode(&mut pool, mode)?;
        }
        Some("shares") => {
            let pool = fetch(&controller, args.next())?;
            let breakdown = compute_shares(&pool);
            for share in &breakdown.shares {
                let name = pool
                    .participant(&share.participant_id)
                    .map(|p| p.name.as_str())
                    .unwrap_or("?");
                println!("{name}: {:.2}% = {:.2}", share.percent, share.amount);
            }
            println!("total {:.2}% of bank {:.2}", breakdown.percent_sum, pool.bank());
        }
        Some("check") => {
            let pool = fetch(&controller, args.next())?;
            let report = validate_pool(&pool);
            for issue in report.blocking_issues() {
                println!("blocker: {issue}");
            }
            if !report.has_holder {
                println!("warning: no ticket holder assigned");
            }
            if report.export_ready() {
                println!("ok: pool is ready to finalize");
                println!("digest: {}", agreement_digest(&pool)?);
            }
        }
        Some("export") => {
            let pool = fetch(&controller, args.next())?;
            let path = args
                .next()
                .ok_or(AppError::Usage("poolctl export <pool-id> <path>"))?;
            fs::write(path, export_pool(&pool)?)?;
            println!("exported to {path}");
        }
        Some("import") => {
            let path = args.next().ok_or(AppError::Usage("poolctl import <path>"))?;
            let text = fs::read_to_string(path)?;
            let pool = import_pool(&controller, &text).ok_or(AppError::BadImport)?;
            println!("imported pool {}", pool.id);
        }
        Some("link") => {
            let pool = fetch(&controller, args.next())?;
            let origin = args.next().unwrap_or(DEFAULT_ORIGIN);
            println!("{}", build_smart_link(&pool, origin)?);
        }
        Some("unpack") => {
            let fragment = args
                .next()
                .ok_or(AppError::Usage("poolctl unpack <link-or-fragment>"))?;
            let data = unpack_smart_link_data(fragment)?;
            let pool = import_link_pool(&controller, data).ok_or(AppError::BadImport)?;
            println!("imported pool {} from link", pool.id);
        }
        _ => {
            return Err(AppError::Usage(
                "poolctl <create|list|show|add-participant|contribute|share-mode|shares|check|export|import|link|unpack> ...",
            ))
        }
    }
    Ok(())
}

fn fetch<R: pool_store::PoolRepository>(
    controller: &PoolController<R>,
    id: Option<&str>,
) -> Result<Pool, AppError> {
    let id = id.ok_or(AppError::Usage("expected a pool id argument"))?;
    controller
        .get(id)
        .ok_or_else(|| AppError::NotFound(id.to_string()))
}

fn parse_draw_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::BadDrawDate(raw.to_string()))
}
