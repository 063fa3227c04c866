use std::fs::File;
use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::{IdPatterns, OrganismCode};
use crate::error::KeggError;
use crate::kegg::KeggClient;

/// Progress trace emitted while a run is in flight. `Pathway` carries each
/// pathway reference as it is picked up, `RawCompound` each compound reference
/// as it is extracted; both are echoed to stdout by the CLI.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Pathway(String),
    RawCompound(String),
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// Sink for callers that do not care about the trace.
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn event(&self, _event: ProgressEvent) {}
}

#[derive(Debug)]
pub struct ExportResult {
    pub organism: OrganismCode,
    pub items: Vec<PathwayOutcome>,
}

impl ExportResult {
    pub fn exported(&self) -> usize {
        self.items.iter().filter(|item| item.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.exported()
    }
}

/// Per-pathway result. A failed pathway does not abort the run; it is recorded
/// here and reported in the aggregate summary.
#[derive(Debug)]
pub struct PathwayOutcome {
    pub pathway: String,
    pub outcome: Result<PathwayFiles, KeggError>,
}

#[derive(Debug, Clone)]
pub struct PathwayFiles {
    pub compounds_file: Utf8PathBuf,
    pub reactions_file: Utf8PathBuf,
    pub compound_count: usize,
    pub reaction_count: usize,
}

pub struct Exporter<K: KeggClient> {
    kegg: K,
}

impl<K: KeggClient> Exporter<K> {
    pub fn new(kegg: K) -> Self {
        Self { kegg }
    }

    /// Runs the full pipeline: list pathways for the organism, then per
    /// pathway fetch its reaction and compound links and write the two ID
    /// files under `prefix`. A failure of the initial listing call is fatal;
    /// per-pathway failures are collected and the run continues.
    pub fn export(
        &self,
        organism: &OrganismCode,
        prefix: &str,
        sink: &dyn ProgressSink,
    ) -> Result<ExportResult, KeggError> {
        let patterns = IdPatterns::for_organism(organism);
        let pathways = self.kegg.list_pathways(organism)?;
        tracing::debug!(count = pathways.len(), organism = %organism, "pathways listed");

        let mut items = Vec::with_capacity(pathways.len());
        for pathway in pathways {
            sink.event(ProgressEvent::Pathway(pathway.clone()));
            let outcome = self.export_pathway(&pathway, organism, prefix, &patterns, sink);
            if let Err(err) = &outcome {
                tracing::warn!(pathway = %pathway, error = %err, "pathway export failed");
            }
            items.push(PathwayOutcome { pathway, outcome });
        }

        Ok(ExportResult {
            organism: organism.clone(),
            items,
        })
    }

    fn export_pathway(
        &self,
        pathway: &str,
        organism: &OrganismCode,
        prefix: &str,
        patterns: &IdPatterns,
        sink: &dyn ProgressSink,
    ) -> Result<PathwayFiles, KeggError> {
        let number = patterns.pathway_number(pathway)?;

        let reactions = self.kegg.get_reactions_by_pathway(pathway)?;
        let compounds = self.kegg.get_compounds_by_pathway(pathway)?;

        // Every identifier is extracted before either file is opened, so a
        // malformed entry leaves no partial file behind.
        let mut compound_ids = Vec::with_capacity(compounds.len());
        for raw in &compounds {
            sink.event(ProgressEvent::RawCompound(raw.clone()));
            compound_ids.push(patterns.compound_id(raw)?);
        }
        let mut reaction_ids = Vec::with_capacity(reactions.len());
        for raw in &reactions {
            reaction_ids.push(patterns.reaction_id(raw)?);
        }

        let compounds_file = Utf8PathBuf::from(format!("{prefix}{organism}{number}.cpd"));
        let reactions_file = Utf8PathBuf::from(format!("{prefix}{organism}{number}.rn"));

        write_ids(compound_ids.iter().map(|id| id.as_str()), &compounds_file)?;
        write_ids(reaction_ids.iter().map(|id| id.as_str()), &reactions_file)?;

        Ok(PathwayFiles {
            compounds_file,
            reactions_file,
            compound_count: compound_ids.len(),
            reaction_count: reaction_ids.len(),
        })
    }
}

/// Creates or truncates `destination` and writes one identifier per line in
/// input order. The parent directory must already exist. The handle is scoped
/// to this function, so the file is closed however the loop exits.
fn write_ids<'a, I>(ids: I, destination: &Utf8Path) -> Result<(), KeggError>
where
    I: IntoIterator<Item = &'a str>,
{
    let file = File::create(destination)
        .map_err(|err| KeggError::Filesystem(format!("create {destination}: {err}")))?;
    let mut writer = BufWriter::new(file);
    for id in ids {
        writeln!(writer, "{id}")
            .map_err(|err| KeggError::Filesystem(format!("write {destination}: {err}")))?;
    }
    writer
        .flush()
        .map_err(|err| KeggError::Filesystem(format!("write {destination}: {err}")))
}
