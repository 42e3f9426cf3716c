use crate::cli::{PpiArgs, TableFormat};
use crate::error::Result;
use crate::utils::http::HttpInteractionClient;
use crate::utils::{output, parser};
use molgraph::workflows::ppi::{PpiGraphBuilder, PpiParams};
use tracing::info;

pub fn run(args: PpiArgs) -> Result<()> {
    let params = args
        .params
        .iter()
        .map(|pair| parser::parse_key_value(pair))
        .collect::<std::result::Result<PpiParams, _>>()?;
    let sources = (!args.sources.is_empty()).then(|| args.sources.clone());

    let mut builder = PpiGraphBuilder::new(&args.proteins, sources, params)?
        .paginate(!args.no_paginate);
    if let Some(taxon_id) = args.taxon_id {
        builder = builder.taxon_id(taxon_id);
    }
    info!(
        "Querying {:?} for {} proteins...",
        builder.sources(),
        builder.proteins().len()
    );

    let client = HttpInteractionClient::new()?;
    let network = builder.fetch(&client)?;
    info!("Collected {} interactions.", network.interactions.len());

    let destination = args.output.as_deref();
    match args.format {
        TableFormat::Json => output::write_json(&network, destination)?,
        TableFormat::Csv => output::write_csv(&network.interactions, destination)?,
    }

    if let Some(path) = destination {
        eprintln!(
            "✓ {} interactions written to: {}",
            network.interactions.len(),
            path.display()
        );
    }
    Ok(())
}
