use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Table};
use polars::prelude::DataFrame;
use sdmx_cli::render::{apply_table_style, frame_table, header_cell, truncation_note, write_csv};
use sdmx_client::{HttpConfig, HttpTransport, SourceClient};
use sdmx_ingest::{catalog_frame, code_list_frame, observations_frame};
use sdmx_model::{CodeListScope, QueryOptions};
use sdmx_registry::{Provider, ProviderConfig};
use tracing::info;

use crate::cli::{CodelistArgs, DataArgs, ProviderArgs, RevisionsArgs};

/// Settings shared by every networked command.
pub struct Session {
    pub config: Option<PathBuf>,
    pub timeout: Duration,
}

impl Session {
    fn provider_config(&self, provider: Provider) -> Result<ProviderConfig> {
        let Some(path) = &self.config else {
            return Ok(ProviderConfig::builtin(provider));
        };
        let config = ProviderConfig::from_path(path)
            .with_context(|| format!("load provider configuration {}", path.display()))?;
        if config.provider != provider {
            bail!(
                "configuration {} is for {}, not {provider}",
                path.display(),
                config.provider
            );
        }
        Ok(config)
    }

    fn connect(&self, provider: Provider) -> Result<SourceClient> {
        let config = self.provider_config(provider)?;
        let transport = HttpTransport::new(&HttpConfig {
            timeout: self.timeout,
            ..HttpConfig::default()
        })?;
        let client = SourceClient::connect(config, transport)
            .with_context(|| format!("connect to {provider}"))?;
        Ok(client)
    }
}

pub fn run_flows(session: &Session, args: &ProviderArgs) -> Result<()> {
    let client = session.connect(args.provider.into())?;
    let df = catalog_frame(client.list_flows())?;
    println!("{}", frame_table(&df, df.height())?);
    println!("{} data-flows", df.height());
    Ok(())
}

pub fn run_data(session: &Session, args: &DataArgs) -> Result<()> {
    let client = session.connect(args.provider.into())?;
    let options: QueryOptions = args.options.iter().cloned().collect();
    let table = client.fetch_data(&args.flow, &options)?;
    let mut df = observations_frame(&table)?;
    emit(&mut df, args.output.as_deref(), args.limit)
}

pub fn run_codelist(session: &Session, args: &CodelistArgs) -> Result<()> {
    let client = session.connect(args.provider.into())?;
    let scope = match &args.flow {
        Some(flow) => CodeListScope::Flow(flow.clone()),
        None => CodeListScope::All,
    };
    let entries = client.fetch_code_list(&scope)?;
    let mut df = code_list_frame(&entries)?;
    emit(&mut df, args.output.as_deref(), args.limit)
}

pub fn run_revisions(session: &Session, args: &RevisionsArgs) -> Result<()> {
    let client = session.connect(args.provider.into())?;
    let table = client.fetch_revisions(&args.key)?;
    let mut df = observations_frame(&table)?;
    emit(&mut df, args.output.as_deref(), args.limit)
}

/// Lists accepted query options without contacting the provider.
pub fn run_options(session: &Session, args: &ProviderArgs) -> Result<()> {
    let config = session.provider_config(args.provider.into())?;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Option"), header_cell("Query parameter")]);
    apply_table_style(&mut table);
    for (name, template) in config.inputs.iter() {
        table.add_row(vec![Cell::new(name), Cell::new(template)]);
    }
    println!("{table}");
    println!("Documentation: {}", config.help_url);
    Ok(())
}

pub fn run_providers() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Name"),
        header_cell("Documentation"),
    ]);
    apply_table_style(&mut table);
    for provider in Provider::ALL {
        let config = ProviderConfig::builtin(provider);
        table.add_row(vec![
            Cell::new(provider.code()),
            Cell::new(provider.label()),
            Cell::new(config.help_url),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn emit(df: &mut DataFrame, output: Option<&Path>, limit: usize) -> Result<()> {
    if let Some(path) = output {
        write_csv(df, path)?;
        info!(rows = df.height(), path = %path.display(), "Table written");
        println!("Wrote {} rows to {}", df.height(), path.display());
        return Ok(());
    }
    println!("{}", frame_table(df, limit)?);
    if let Some(note) = truncation_note(limit.min(df.height()), df.height()) {
        println!("{note}");
    }
    Ok(())
}
