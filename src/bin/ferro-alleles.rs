// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-alleles CLI
//!
//! Resolves the reference and alternate alleles of variation sites against a
//! reference genome.

use clap::{Parser, Subcommand};
use ferro_alleles::cli::{
    output_alleles, output_error_with_context, output_overlap, parse_keep_list, read_sites,
    OutputFormat,
};
use ferro_alleles::config::FerroConfig;
use ferro_alleles::{
    AlleleString, CachedFastaProvider, FastaProvider, Feature, FerroError, MockProvider,
    OverlapConfig, ReferenceProvider, VariationOverlap,
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "ferro-alleles")]
#[command(author, version, about = "Resolve reference and alternate alleles at variation sites")]
#[command(long_about = "Resolve reference and alternate alleles at variation sites.

Examples:
  ferro-alleles resolve --fasta GRCh38.fa sites.tsv
  ferro-alleles resolve --fasta GRCh38.fa --feature chr7:140719327-140924929:- sites.tsv
  ferro-alleles resolve --fasta GRCh38.fa --disambiguate --keep A,G -f json sites.tsv
  ferro-alleles expand '(CA)3/-/CA'

Sites files are tab-separated: id name contig start end strand allele_string.
Defaults can be set in .ferro.toml under [alleles] and [reference].")]
struct Cli {
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build overlaps for every site in a sites file
    Resolve {
        /// Tab-separated sites file (use - for stdin)
        sites: PathBuf,

        /// Reference FASTA file (uncompressed, optionally with .fai index)
        #[arg(long)]
        fasta: Option<PathBuf>,

        /// Feature region contig:start-end[:strand] applied to every site
        #[arg(long)]
        feature: Option<String>,

        /// Expand single-nucleotide IUPAC codes into their bases
        #[arg(long)]
        disambiguate: bool,

        /// Take the reference allele from the allele string, not the genome
        #[arg(long)]
        no_ref_check: bool,

        /// Comma-separated alternate sequences to keep
        #[arg(long)]
        keep: Option<String>,

        /// Reduce each overlap to a single representative allele
        #[arg(long)]
        sara: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Decode an allele string into its literal alleles
    Expand {
        /// Allele string, e.g. '(CA)3/-'
        allele_string: String,

        /// Expand single-nucleotide IUPAC codes
        #[arg(long)]
        disambiguate: bool,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = FerroConfig::load().unwrap_or_default();

    match cli.command {
        Commands::Resolve {
            sites,
            fasta,
            feature,
            disambiguate,
            no_ref_check,
            keep,
            sara,
            output,
            format,
        } => {
            let options = ResolveOptions {
                fasta: fasta.or_else(|| config.reference.fasta.clone()),
                feature,
                keep: config.merge_keep(&keep.as_deref().map(parse_keep_list).unwrap_or_default()),
                sara,
                format: format.parse()?,
            };
            let overlap_config = config.merge_with_cli(disambiguate, no_ref_check);
            run_resolve(&sites, output.as_deref(), &options, overlap_config, config.cache_size())
        }
        Commands::Expand {
            allele_string,
            disambiguate,
            format,
        } => {
            let mut alleles = AlleleString::decode(&allele_string);
            if disambiguate || config.to_overlap_config().disambiguate_single_nucleotide {
                alleles = alleles.disambiguated();
            }
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            output_alleles(&mut writer, &allele_string, &alleles, format.parse()?)?;
            Ok(())
        }
    }
}

/// Settings for the `resolve` subcommand after merging CLI flags with the config file
struct ResolveOptions {
    fasta: Option<PathBuf>,
    feature: Option<String>,
    keep: Vec<String>,
    sara: bool,
    format: OutputFormat,
}

fn run_resolve(
    sites_path: &Path,
    output: Option<&Path>,
    options: &ResolveOptions,
    overlap_config: OverlapConfig,
    cache_size: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = match &options.fasta {
        Some(path) => {
            info!("Loading reference from {}", path.display());
            CachedFastaProvider::new(FastaProvider::new(path)?, cache_size)
        }
        None if overlap_config.no_reference_check => {
            return run_resolve_with(
                sites_path,
                output,
                options,
                overlap_config,
                &MockProvider::new(),
            );
        }
        None => {
            return Err(Box::new(FerroError::Config {
                msg: "a reference FASTA is required unless --no-ref-check is given".to_string(),
            }));
        }
    };

    run_resolve_with(sites_path, output, options, overlap_config, &provider)?;
    let stats = provider.cache_stats();
    debug!(
        "Reference cache: {} hits, {} misses ({:.1}% hit rate)",
        stats.hits,
        stats.misses,
        stats.hit_rate()
    );
    Ok(())
}

fn run_resolve_with<P: ReferenceProvider>(
    sites_path: &Path,
    output: Option<&Path>,
    options: &ResolveOptions,
    overlap_config: OverlapConfig,
    provider: &P,
) -> Result<(), Box<dyn std::error::Error>> {
    let sites = if sites_path.as_os_str() == "-" {
        read_sites(io::stdin().lock())
    } else {
        read_sites(BufReader::new(File::open(sites_path)?))
    };

    let fixed_feature = options
        .feature
        .as_deref()
        .map(|region| Feature::from_region("feature", region))
        .transpose()?;

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let stderr = io::stderr();
    let mut err_writer = stderr.lock();

    let mut resolved = 0usize;
    let mut failed = 0usize;
    for (line_number, site) in sites {
        let site = match site {
            Ok(site) => site,
            Err(e) => {
                output_error_with_context(
                    &mut err_writer,
                    sites_path.to_string_lossy().as_ref(),
                    &e,
                    options.format,
                    Some(line_number),
                )?;
                failed += 1;
                continue;
            }
        };

        let feature = match &fixed_feature {
            Some(feature) if feature.overlaps(&site) => feature.clone(),
            Some(feature) => {
                warn!("{} does not overlap {}; skipping", site.name, feature);
                continue;
            }
            None => Feature::spanning(&site),
        };

        let name = site.name.clone();
        match VariationOverlap::new(feature, site, provider, overlap_config) {
            Ok(mut overlap) => {
                if !options.keep.is_empty() {
                    overlap.filter_alternates(&options.keep);
                }
                if options.sara {
                    overlap.reduce_to_single_representative();
                }
                output_overlap(&mut writer, &overlap, options.format)?;
                resolved += 1;
            }
            Err(e) => {
                output_error_with_context(
                    &mut err_writer,
                    &name,
                    &e,
                    options.format,
                    Some(line_number),
                )?;
                failed += 1;
            }
        }
    }

    writer.flush()?;
    info!("Resolved {} site(s), {} failed", resolved, failed);
    Ok(())
}

/// Install a stderr fmt subscriber; `RUST_LOG` wins over `--log-level`.
fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| format!("Invalid log level '{}': {}", level, e))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    Ok(())
}
