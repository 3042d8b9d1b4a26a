use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use dtl_codec::{AnyRecord, RecordCodec};
use dtl_dispatch::{Dispatcher, Operation};
use dtl_ledger::{Ledger, SystemClock};
use dtl_server::DtlServer;
use dtl_store::FileStateStore;
use dtl_types::{Donator, Project, Receiver};

use crate::cli::*;
use crate::config::DtlConfig;

type LocalDispatcher = Dispatcher<FileStateStore, SystemClock>;

pub fn run_command(cli: Cli, mut config: DtlConfig) -> anyhow::Result<()> {
    if let Some(state) = cli.state {
        config.state_path = state;
    }
    match cli.command {
        Command::Serve(args) => cmd_serve(&config, args),
        command => {
            let dispatcher = open_dispatcher(&config.state_path)?;
            let output = execute(&dispatcher, command, &cli.format)?;
            println!("{output}");
            Ok(())
        }
    }
}

fn open_dispatcher(state_path: &Path) -> anyhow::Result<LocalDispatcher> {
    let store = FileStateStore::open(state_path)
        .with_context(|| format!("opening state {}", state_path.display()))?;
    Ok(Dispatcher::new(Ledger::new(store, SystemClock::new())))
}

fn execute(
    dispatcher: &LocalDispatcher,
    command: Command,
    format: &OutputFormat,
) -> anyhow::Result<String> {
    match command {
        Command::RegisterDonator(args) => {
            mutate(dispatcher, Operation::RegisterDonator, &[args.name], format)
        }
        Command::RegisterReceiver(args) => {
            mutate(dispatcher, Operation::RegisterReceiver, &[args.name], format)
        }
        Command::RegisterProject(args) => {
            mutate(dispatcher, Operation::RegisterProject, &[args.name], format)
        }
        Command::Donate(args) => mutate(
            dispatcher,
            Operation::Donate,
            &[args.donator, args.project, args.amount],
            format,
        ),
        Command::Assign(args) => mutate(
            dispatcher,
            Operation::Assign,
            &[args.project, args.receiver, args.amount],
            format,
        ),
        Command::TrackDonator(args) => track(dispatcher, Operation::TrackDonator, args.name, format),
        Command::TrackReceiver(args) => {
            track(dispatcher, Operation::TrackReceiver, args.name, format)
        }
        Command::TrackProject(args) => track(dispatcher, Operation::TrackProject, args.name, format),
        Command::Invoke(args) => {
            let payload = dispatcher.invoke(&args.function, args.args.as_slice())?;
            Ok(render_payload(payload.as_deref(), format))
        }
        Command::Query(args) => {
            let payload = dispatcher.query(&args.function, args.args.as_slice())?;
            Ok(render_payload(payload.as_deref(), format))
        }
        Command::Serve(_) => anyhow::bail!("serve does not run against a local ledger"),
    }
}

fn mutate(
    dispatcher: &LocalDispatcher,
    op: Operation,
    args: &[String],
    format: &OutputFormat,
) -> anyhow::Result<String> {
    dispatcher.execute(op, args)?;
    Ok(match format {
        OutputFormat::Json => serde_json::json!({
            "operation": op.name(),
            "args": args,
            "status": "ok",
        })
        .to_string(),
        OutputFormat::Text => format!("{} {} {}", "✓".green().bold(), op, args.join(" ")),
    })
}

fn track(
    dispatcher: &LocalDispatcher,
    op: Operation,
    name: String,
    format: &OutputFormat,
) -> anyhow::Result<String> {
    let bytes = dispatcher
        .execute(op, &[name])?
        .with_context(|| format!("{op} returned no payload"))?;
    let record = RecordCodec::decode_any(&bytes)?;
    render_record(&record, format)
}

fn render_payload(payload: Option<&[u8]>, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::json!({ "payload": payload.map(hex::encode) }).to_string(),
        OutputFormat::Text => match payload {
            Some(bytes) => hex::encode(bytes),
            None => format!("{} ok", "✓".green().bold()),
        },
    }
}

fn render_record(record: &AnyRecord, format: &OutputFormat) -> anyhow::Result<String> {
    if let OutputFormat::Json = format {
        let value = match record {
            AnyRecord::Donator(d) => serde_json::to_string_pretty(d)?,
            AnyRecord::Receiver(r) => serde_json::to_string_pretty(r)?,
            AnyRecord::Project(p) => serde_json::to_string_pretty(p)?,
        };
        return Ok(value);
    }
    Ok(match record {
        AnyRecord::Donator(d) => render_donator(d),
        AnyRecord::Receiver(r) => render_receiver(r),
        AnyRecord::Project(p) => render_project(p),
    })
}

fn render_donator(d: &Donator) -> String {
    let mut out = format!(
        "Donator {} (registered {})\n  Total donated: {}\n  Donations: {}",
        d.name.yellow().bold(),
        d.registered_at.to_string().dimmed(),
        d.total_donated.to_string().bold(),
        d.donation_count,
    );
    for record in &d.records {
        out.push_str(&format!(
            "\n  {} {} {} at {}",
            format!("#{}", record.sequence_index).yellow(),
            record.project.cyan(),
            record.amount,
            record.timestamp.to_string().dimmed(),
        ));
    }
    out
}

fn render_receiver(r: &Receiver) -> String {
    format!(
        "Receiver {} (registered {})\n  Balance: {}\n  Last project: {}",
        r.name.yellow().bold(),
        r.registered_at.to_string().dimmed(),
        r.balance.to_string().bold(),
        r.last_project.as_deref().unwrap_or("-").cyan(),
    )
}

fn render_project(p: &Project) -> String {
    format!(
        "Project {} (registered {})",
        p.name.yellow().bold(),
        p.registered_at.to_string().dimmed(),
    )
}

fn cmd_serve(config: &DtlConfig, args: ServeArgs) -> anyhow::Result<()> {
    let server = DtlServer::from_config(config.server_config(args.bind))?;
    println!(
        "DTL server on {} (state: {})",
        server.config().bind_addr.to_string().bold(),
        server.config().state_path.display(),
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}
