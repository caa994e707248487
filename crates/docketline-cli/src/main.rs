mod display;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use docketline_ai::{CannedTips, GeminiConfig, GeminiTips, TipAdvisor, TipSource};
use docketline_core::{Case, DocketError, DocketNormalizer, StageNames, StageView, stage_views};
use docketline_sync::datajud::{DEFAULT_ENDPOINT, parse_response};
use docketline_sync::{DatajudClient, DatajudConfig, FetchError, ResilientFetcher};
use serde::Serialize;

use crate::display::{DEFAULT_HISTORY_ITEMS, render_case};

const NOT_FOUND_MESSAGE: &str = "Processo não encontrado. Verifique o número e tente novamente.";
const EMPTY_HISTORY_MESSAGE: &str =
    "Não foi possível processar os dados do processo: histórico vazio.";

#[derive(Parser)]
#[command(name = "docketline", version, about = "Acompanhe o andamento de um processo judicial")]
struct Cli {
    #[command(flatten)]
    registry: RegistryArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct RegistryArgs {
    /// Datajud `_search` endpoint of the tribunal
    #[arg(long, env = "DATAJUD_URL", default_value = DEFAULT_ENDPOINT, global = true)]
    registry_url: String,

    /// Datajud public API key
    #[arg(long, env = "DATAJUD_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Proxy prefix prepended to the registry URL
    #[arg(long, env = "DATAJUD_PROXY_URL", global = true)]
    proxy_url: Option<String>,

    /// Gemini API key for generated tips (canned tips otherwise)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    gemini_api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 15, global = true)]
    timeout_secs: u64,
}

#[derive(Args)]
struct OutputArgs {
    /// Print the case as JSON
    #[arg(long)]
    json: bool,

    /// Skip the advisory tip
    #[arg(long)]
    no_tips: bool,

    /// Number of history entries to show
    #[arg(long, default_value_t = DEFAULT_HISTORY_ITEMS)]
    history: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Look a case up in the registry
    Search {
        /// Case number, e.g. 0012345-67.2024.8.26.0001
        numero: String,

        /// Do not contact the registry; show demonstration data
        #[arg(long)]
        offline: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Normalize a saved Datajud search response
    Inspect {
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Serialize)]
struct CaseReport<'a> {
    #[serde(flatten)]
    case: &'a Case,
    stages: Vec<StageView>,
    is_synthetic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tip: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("docketline v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let names = StageNames::default();
    let timeout = Duration::from_secs(cli.registry.timeout_secs);

    let (case, is_synthetic, output) = match cli.command {
        Command::Search {
            numero,
            offline,
            output,
        } => {
            let client = DatajudClient::new(DatajudConfig {
                endpoint: cli.registry.registry_url.clone(),
                proxy_prefix: cli.registry.proxy_url.clone(),
                api_key: cli.registry.api_key.clone(),
                timeout,
            })
            .context("building registry client")?;
            let fetcher = ResilientFetcher::new(client);

            if offline {
                (fetcher.synthetic_case(&numero).map_err(user_error)?, true, output)
            } else {
                let result = fetcher.find_case(&numero).await.map_err(user_error)?;
                (result.case, result.is_synthetic, output)
            }
        }
        Command::Inspect { file, output } => {
            let body = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let raw = parse_response(&body)
                .with_context(|| format!("decoding {}", file.display()))?
                .ok_or_else(|| anyhow::anyhow!(NOT_FOUND_MESSAGE))?;
            let case = DocketNormalizer::default()
                .normalize(&raw)
                .map_err(|e| user_error(e.into()))?;
            (case, false, output)
        }
    };

    let tip = if output.no_tips {
        None
    } else {
        let source = tip_source(cli.registry.gemini_api_key, timeout)?;
        TipAdvisor::new(source, names.clone()).observe(&case).await
    };

    if output.json {
        let report = CaseReport {
            case: &case,
            stages: stage_views(case.current_stage, &names),
            is_synthetic,
            tip,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            render_case(&case, &names, is_synthetic, output.history, tip.as_deref())
        );
    }

    Ok(())
}

/// Gemini when a key is configured, the canned table otherwise.
fn tip_source(gemini_api_key: Option<String>, timeout: Duration) -> anyhow::Result<Box<dyn TipSource>> {
    match gemini_api_key {
        Some(key) => {
            let tips = GeminiTips::new(GeminiConfig {
                api_key: Some(key),
                timeout,
                ..Default::default()
            })
            .context("building tip client")?;
            Ok(Box::new(tips))
        }
        None => Ok(Box::new(CannedTips::default())),
    }
}

/// Map fetch failures to the messages shown to the citizen.
fn user_error(err: FetchError) -> anyhow::Error {
    match err {
        FetchError::NotFound { .. } => anyhow::anyhow!(NOT_FOUND_MESSAGE),
        FetchError::Docket(DocketError::EmptyHistory { .. }) => {
            anyhow::anyhow!(EMPTY_HISTORY_MESSAGE)
        }
    }
}
