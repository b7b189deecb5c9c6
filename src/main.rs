// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Notecite CLI entrypoint.
//!
//! By default this opens the review TUI on the session stored in a folder (the current working
//! directory when none is given). `--check` loads the session and prints a summary instead.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notecite::logging::{self, LogTarget};
use notecite::model::fixtures::demo_record;
use notecite::model::SessionId;
use notecite::query::spans_by_section;
use notecite::review::Review;
use notecite::store::{MemoryStore, SessionFolder, SessionStore, WriteDurability};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<session-dir>] [--durable-writes] [--check] [--log-stderr]\n  {program} [--session <dir>] [--durable-writes] [--check] [--log-stderr]\n  {program} --demo [--check] [--log-stderr]\n\nIf session-dir/--session is omitted, the current working directory is used.\nA folder without a session file is seeded with the demo session.\n--demo keeps the demo session in memory and cannot be combined with session-dir/--session.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n--check prints a session summary instead of starting the TUI.\n--log-stderr writes logs to stderr instead of `notecite.log` in the session folder.\n\nNOTECITE_LOG sets the log filter (default `info`); NOTECITE_PALETTE overrides TUI colors."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    session_dir: Option<String>,
    durable_writes: bool,
    check: bool,
    log_stderr: bool,
}

fn set_flag(flag: &mut bool) -> Result<(), ()> {
    if *flag {
        return Err(());
    }
    *flag = true;
    Ok(())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => set_flag(&mut options.demo)?,
            "--durable-writes" => set_flag(&mut options.durable_writes)?,
            "--check" => set_flag(&mut options.check)?,
            "--log-stderr" => set_flag(&mut options.log_stderr)?,
            "--session" => {
                if options.session_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.session_dir = Some(dir);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.session_dir.is_some() {
                    return Err(());
                }
                options.session_dir = Some(arg);
            }
        }
    }

    if options.demo && options.session_dir.is_some() {
        return Err(());
    }

    Ok(options)
}

fn log_target(options: &CliOptions) -> LogTarget {
    if options.log_stderr {
        LogTarget::Stderr
    } else if options.demo {
        LogTarget::File(std::env::temp_dir().join(format!("notecite-demo-{}", std::process::id())))
    } else {
        LogTarget::File(PathBuf::from(options.session_dir.as_deref().unwrap_or(".")))
    }
}

fn print_summary(review: &Review) {
    let session = review.session();
    println!(
        "{} · {} with {} · {}",
        session.id(),
        session.patient_name(),
        session.clinician_name(),
        session.status().as_str()
    );
    println!(
        "{} transcript segments, {} note statements ({} need review), {} cited segments",
        review.segments().len(),
        review.note_spans().len(),
        review.needs_confirmation_count(),
        review.index().len()
    );
    let sections = spans_by_section(review.note_spans())
        .into_iter()
        .map(|group| format!("{}: {}", group.section.label(), group.span_indices.len()))
        .collect::<Vec<_>>();
    println!("{}", sections.join(" · "));
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "notecite".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let _log_guard = logging::init(&log_target(&options))?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("notecite-store")
            .enable_all()
            .build()?;

        let (store, session_id): (Arc<dyn SessionStore>, SessionId) = if options.demo {
            let record = demo_record();
            let session_id = record.session.id().clone();
            (Arc::new(MemoryStore::with_record(record)), session_id)
        } else {
            let dir = options.session_dir.clone().unwrap_or_else(|| ".".to_owned());
            let folder = if options.durable_writes {
                SessionFolder::new(dir).with_durability(WriteDurability::Durable)
            } else {
                SessionFolder::new(dir)
            };
            let record = folder.load_or_init()?;
            let session_id = record.session.id().clone();
            (Arc::new(folder), session_id)
        };

        let loaded = runtime.block_on(Review::load(store.as_ref(), &session_id));

        if options.check {
            print_summary(&loaded?);
            return Ok(());
        }

        notecite::tui::run(loaded, store, runtime.handle().clone())?;
        runtime.shutdown_timeout(Duration::from_secs(2));
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("notecite: {err}");
        std::process::exit(1);
    }
}
