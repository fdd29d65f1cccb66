//! Command handlers for the `densegroup` binary.

use super::args::{Cli, Commands};
use crate::config::{load_config, load_config_from, validate_config, DensegroupConfig};
use crate::core::{Item, NamedCluster};
use crate::ingest::{Checkpoint, EmbeddingOutcome, EmbeddingPipeline, HashingEmbedder};
use crate::io::{ensure_dir, read_items, write_records, InputRow, OutputFormat, VectorStore};
use crate::naming::ClusterNamer;
use crate::observability::{set_phase, set_progress, RunPhase};
use crate::pipeline::GroupingPipeline;
use crate::progress::{ProgressConfig, TEMPLATE_EMBEDDING};
use crate::utils::{format_elapsed, truncate};
use anyhow::{bail, Context, Result};
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

const SAMPLE_MEMBERS: usize = 3;
const INSPECT_VALUES: usize = 5;

/// Resolve configuration and dispatch the parsed command.
pub fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(dir) = cli.store_dir {
        config.store.dir = dir;
    }
    if let Some(collection) = cli.collection {
        config.store.collection = collection;
    }
    let progress = ProgressConfig::from_env(cli.quiet);

    match cli.command {
        Commands::Index { input, no_resume } => {
            validate_config(&config)?;
            handle_index(&config, &progress, &input, !no_resume)
        }
        Commands::Cluster {
            min_cluster_size,
            output_dir,
            format,
            top,
        } => {
            if let Some(size) = min_cluster_size {
                config.clustering.min_cluster_size = size;
            }
            if let Some(format) = format {
                config.output.format = format;
            }
            validate_config(&config)?;
            let output_dir = output_dir.unwrap_or_else(|| PathBuf::from("."));
            handle_cluster(&config, &progress, &output_dir, top)
        }
        Commands::Inspect => handle_inspect(&config),
        Commands::Clear => handle_clear(&config),
    }
}

fn open_store(config: &DensegroupConfig) -> Result<VectorStore> {
    let _phase = set_phase(RunPhase::Storing);
    VectorStore::open(&config.store.dir, &config.store.collection).with_context(|| {
        format!(
            "Failed to open collection `{}` in {}",
            config.store.collection,
            config.store.dir.display()
        )
    })
}

fn checkpoint_path(store: &VectorStore) -> PathBuf {
    store
        .dir()
        .join(format!("{}.checkpoint.json", store.collection()))
}

/// Embed the rows of `input` that are not stored yet and add them.
pub fn handle_index(
    config: &DensegroupConfig,
    progress: &ProgressConfig,
    input: &Path,
    resume: bool,
) -> Result<()> {
    let started = Instant::now();

    let rows = {
        let _phase = set_phase(RunPhase::ReadingInput);
        read_items(input).with_context(|| format!("Failed to read {}", input.display()))?
    };
    let total_rows = rows.len();

    let mut store = open_store(config)?;
    let fresh = new_rows(rows, &store);
    let skipped = total_rows - fresh.len();

    if fresh.is_empty() {
        store.close()?;
        println!(
            "{} {} rows read, nothing new to index ({} already stored or repeated)",
            "✓".green(),
            total_rows,
            skipped
        );
        return Ok(());
    }

    let checkpoint = checkpoint_path(&store);
    if !resume {
        Checkpoint::remove(&checkpoint)?;
    }

    let texts: Vec<String> = fresh.iter().map(|row| row.name.clone()).collect();
    let pipeline = EmbeddingPipeline::new(
        HashingEmbedder::new(config.ingest.dimensions),
        config.ingest.clone(),
        config.retry.clone(),
    );

    let bar = progress.create_bar(texts.len() as u64, TEMPLATE_EMBEDDING);
    bar.set_message("Embedding");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;
    let report = {
        let _phase = set_phase(RunPhase::Embedding);
        runtime.block_on(pipeline.run(&texts, Some(&checkpoint), |p| {
            bar.set_position(p.completed as u64);
            set_progress(p.completed, p.total);
        }))?
    };
    bar.finish_and_clear();

    let failed = report.failed_count();
    let resumed = report.resumed;
    let items: Vec<Item> = fresh
        .into_iter()
        .zip(report.outcomes)
        .filter_map(|(row, outcome)| match outcome {
            EmbeddingOutcome::Embedded { embedding, .. } => {
                Some(Item::new(row.id, row.name, embedding))
            }
            EmbeddingOutcome::Failed { .. } => None,
        })
        .collect();

    let added = {
        let _phase = set_phase(RunPhase::Storing);
        let added = store
            .add(items)
            .context("Embeddings do not fit the stored collection; run `densegroup clear` first")?;
        store.close()?;
        added
    };
    Checkpoint::remove(&checkpoint)?;
    info!(added, failed, skipped, resumed, "Index complete");

    println!(
        "{} Indexed {} items into `{}` in {}",
        "✓".green(),
        added.to_string().bold(),
        config.store.collection,
        format_elapsed(started.elapsed())
    );
    if resumed > 0 {
        println!("  {} restored from checkpoint", resumed);
    }
    if skipped > 0 {
        println!("  {} rows skipped (already stored or repeated)", skipped);
    }
    if failed > 0 {
        println!(
            "  {} {} items could not be embedded; run `index` again to retry them",
            "!".yellow(),
            failed
        );
    }
    Ok(())
}

/// Rows whose id is neither stored nor seen earlier in the input.
fn new_rows(rows: Vec<InputRow>, store: &VectorStore) -> Vec<InputRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| !store.contains(&row.id) && seen.insert(row.id.clone()))
        .collect()
}

/// Cluster the stored items, preview the largest groups and write records.
pub fn handle_cluster(
    config: &DensegroupConfig,
    progress: &ProgressConfig,
    output_dir: &Path,
    top: usize,
) -> Result<()> {
    let started = Instant::now();
    let store = open_store(config)?;
    if store.is_empty() {
        bail!(
            "Collection `{}` is empty; run `densegroup index <file.csv>` first",
            config.store.collection
        );
    }

    let pipeline = GroupingPipeline::new(
        config.clustering,
        ClusterNamer::new(config.category_table()),
    );
    let spinner = progress.create_spinner("Clustering");
    let report = {
        let _phase = set_phase(RunPhase::Clustering);
        pipeline.run(store.items())?
    };
    spinner.finish_and_clear();
    store.close()?;

    if report.has_clusters() {
        println!("{}", format!("Top {} groups", top.min(report.merged.len())).bold());
        println!("{}", preview_table(&report.merged, top));
    } else {
        println!(
            "{}",
            "No clusters found: every item was classified as noise. Try a smaller --min-cluster-size."
                .yellow()
        );
    }

    let format = config.output.format;
    let clustered = output_path(output_dir, &config.output.clustered_file, format);
    let merged = output_path(output_dir, &config.output.merged_file, format);
    {
        let _phase = set_phase(RunPhase::OutputGeneration);
        ensure_dir(output_dir)?;
        write_records(&clustered, &report.cluster_records(), format)?;
        write_records(&merged, &report.merged_records(), format)?;
    }

    let stats = report.stats;
    println!();
    println!("Input rows:     {}", stats.input_items);
    println!(
        "Output rows:    {} ({} clusters before merging, {} items as noise)",
        stats.merged_clusters, stats.clusters, stats.noise_items
    );
    println!(
        "Reduction:      {:.1}%",
        stats.reduction_percent(stats.merged_clusters)
    );
    println!("Elapsed:        {}", format_elapsed(started.elapsed()));
    println!("Wrote {} and {}", clustered.display(), merged.display());
    Ok(())
}

fn output_path(dir: &Path, file_name: &str, format: OutputFormat) -> PathBuf {
    dir.join(file_name).with_extension(format.extension())
}

fn preview_table(clusters: &[NamedCluster], top: usize) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Group", "Name", "Members", "Sample"]);

    for cluster in clusters.iter().take(top) {
        let sample: Vec<&str> = cluster
            .members
            .iter()
            .take(SAMPLE_MEMBERS)
            .map(|m| m.name.as_str())
            .collect();
        table.add_row(vec![
            Cell::new(cluster.id),
            Cell::new(&cluster.name),
            Cell::new(cluster.len()),
            Cell::new(truncate(&sample.join(", "), 60)),
        ]);
    }
    table
}

/// Print the collection size and the first stored item.
pub fn handle_inspect(config: &DensegroupConfig) -> Result<()> {
    let store = open_store(config)?;
    println!(
        "Collection `{}`: {} items",
        config.store.collection.bold(),
        store.count()
    );
    if let Some(first) = store.peek(1).first() {
        let values: Vec<String> = first
            .embedding
            .iter()
            .take(INSPECT_VALUES)
            .map(|v| format!("{v:.4}"))
            .collect();
        println!("First item:       {} ({})", first.name, first.id);
        println!("Embedding length: {}", first.embedding.len());
        println!("First values:     [{}]", values.join(", "));
    }
    store.close()?;
    Ok(())
}

/// Remove every stored item and any pending checkpoint.
pub fn handle_clear(config: &DensegroupConfig) -> Result<()> {
    let mut store = open_store(config)?;
    let removed = store.count();
    store.clear();
    let checkpoint = checkpoint_path(&store);
    store.close()?;
    Checkpoint::remove(&checkpoint)?;
    println!(
        "{} Removed {} items from `{}`",
        "✓".green(),
        removed,
        config.store.collection
    );
    Ok(())
}
