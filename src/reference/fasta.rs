//! FASTA reference sequence provider
//!
//! Random access to uncompressed FASTA files through a samtools-style `.fai`
//! index. When no index exists next to the FASTA, one is built by scanning
//! the file once.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::cache::{CacheStats, LruCache};
use crate::config::DEFAULT_CACHE_SIZE;
use crate::error::FerroError;
use crate::reference::provider::{check_range, ReferenceProvider};

/// Index entry for a sequence in a FASTA file
#[derive(Debug, Clone, PartialEq, Eq)]
struct FastaIndexEntry {
    /// Sequence name
    name: String,
    /// Length of the sequence
    length: u64,
    /// Byte offset to the start of sequence data
    offset: u64,
    /// Number of bases per line
    line_bases: u64,
    /// Number of bytes per line (including newline)
    line_bytes: u64,
}

/// FASTA-based reference sequence provider
pub struct FastaProvider {
    /// Path to the FASTA file
    path: PathBuf,
    /// Index of sequences
    index: HashMap<String, FastaIndexEntry>,
}

impl FastaProvider {
    /// Create a new FASTA provider from a file path
    ///
    /// Looks for `<path>.fai` and falls back to scanning the FASTA.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened
    /// - The file is gzip-compressed (not supported)
    /// - The index is malformed
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, FerroError> {
        let path = path.as_ref().to_path_buf();

        if is_gzip_file(&path)? {
            return Err(FerroError::Io {
                msg: format!(
                    "FASTA file appears to be gzip-compressed: {}. \
                     Please decompress the file first (e.g., 'bgzip -d {}').",
                    path.display(),
                    path.display()
                ),
            });
        }

        let fai_path = PathBuf::from(format!("{}.fai", path.display()));
        let index = if fai_path.exists() {
            load_fai_index(&fai_path)?
        } else {
            log::debug!("No index found for {}; scanning FASTA", path.display());
            build_fasta_index(&path)?
        };

        Ok(Self { path, index })
    }

    /// Resolve a contig name, trying with and without a `chr` prefix
    fn resolve_name<'a>(&'a self, name: &str) -> Option<&'a FastaIndexEntry> {
        if let Some(entry) = self.index.get(name) {
            return Some(entry);
        }
        let alt_name = match name.strip_prefix("chr") {
            Some(bare) => bare.to_string(),
            None => format!("chr{}", name),
        };
        self.index.get(&alt_name)
    }

    /// Get all sequence names
    pub fn sequence_names(&self) -> impl Iterator<Item = &String> {
        self.index.keys()
    }
}

impl ReferenceProvider for FastaProvider {
    fn get_sequence(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError> {
        let entry = self
            .resolve_name(contig)
            .ok_or_else(|| FerroError::ReferenceNotFound {
                id: contig.to_string(),
            })?;

        check_range(contig, start, end, entry.length)?;
        if start == end {
            return Ok(String::new());
        }

        let line_start = start / entry.line_bases;
        let byte_offset = start % entry.line_bases;
        let file_offset = entry.offset + line_start * entry.line_bytes + byte_offset;

        let seq_len = end - start;
        let num_lines = (seq_len + byte_offset).div_ceil(entry.line_bases);
        let max_bytes = seq_len + num_lines * (entry.line_bytes - entry.line_bases);

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(file_offset))?;

        let mut buffer = Vec::with_capacity(max_bytes as usize);
        file.take(max_bytes).read_to_end(&mut buffer)?;

        let sequence: String = buffer
            .iter()
            .filter(|&&b| b != b'\n' && b != b'\r')
            .take(seq_len as usize)
            .map(|&b| b as char)
            .collect();

        if sequence.len() as u64 != seq_len {
            return Err(FerroError::Io {
                msg: format!(
                    "Truncated read from {}: expected {} bases at {}:{}-{}, got {}",
                    self.path.display(),
                    seq_len,
                    contig,
                    start,
                    end,
                    sequence.len()
                ),
            });
        }

        Ok(sequence.to_uppercase())
    }

    fn contig_length(&self, contig: &str) -> Option<u64> {
        self.resolve_name(contig).map(|e| e.length)
    }
}

/// Load a FASTA index (.fai) file
fn load_fai_index<P: AsRef<Path>>(path: P) -> Result<HashMap<String, FastaIndexEntry>, FerroError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut index = HashMap::new();

    for line in reader.lines() {
        let line = line?;
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 5 {
            if !line.trim().is_empty() {
                log::warn!("Skipping malformed FAI line: {}", line);
            }
            continue;
        }

        let name = fields[0].to_string();
        let parse_field = |value: &str, what: &str| -> Result<u64, FerroError> {
            value.parse().map_err(|_| FerroError::Io {
                msg: format!("Invalid {} '{}' in FAI for sequence '{}'", what, value, name),
            })
        };
        let length = parse_field(fields[1], "length")?;
        let offset = parse_field(fields[2], "offset")?;
        let line_bases = parse_field(fields[3], "line_bases")?;
        let line_bytes = parse_field(fields[4], "line_bytes")?;

        if line_bases == 0 || line_bytes < line_bases {
            return Err(FerroError::Io {
                msg: format!(
                    "Invalid FAI entry for '{}': line_bases={}, line_bytes={}",
                    name, line_bases, line_bytes
                ),
            });
        }

        index.insert(
            name.clone(),
            FastaIndexEntry {
                name,
                length,
                offset,
                line_bases,
                line_bytes,
            },
        );
    }

    Ok(index)
}

/// Build a FASTA index by scanning the file
fn build_fasta_index<P: AsRef<Path>>(
    path: P,
) -> Result<HashMap<String, FastaIndexEntry>, FerroError> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);

    let mut index = HashMap::new();
    let mut current_entry: Option<FastaIndexEntry> = None;
    let mut byte_position = 0u64;
    let mut first_seq_line = true;

    let mut line = String::new();
    loop {
        let line_start = byte_position;
        line.clear();
        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            break;
        }
        byte_position += bytes_read as u64;

        if let Some(header) = line.strip_prefix('>') {
            if let Some(entry) = current_entry.take() {
                index.insert(entry.name.clone(), entry);
            }

            let name = header.split_whitespace().next().unwrap_or("").to_string();
            current_entry = Some(FastaIndexEntry {
                name,
                length: 0,
                offset: byte_position,
                line_bases: 0,
                line_bytes: 0,
            });
            first_seq_line = true;
        } else if let Some(ref mut entry) = current_entry {
            let seq_len = line.trim_end().len() as u64;
            entry.length += seq_len;

            if first_seq_line && seq_len > 0 {
                entry.offset = line_start;
                entry.line_bases = seq_len;
                entry.line_bytes = bytes_read as u64;
                first_seq_line = false;
            }
        }
    }

    if let Some(entry) = current_entry {
        index.insert(entry.name.clone(), entry);
    }

    // Empty records have no line geometry; make them addressable for empty ranges only
    for entry in index.values_mut() {
        if entry.line_bases == 0 {
            log::warn!("FASTA record '{}' has no sequence", entry.name);
            entry.line_bases = 1;
            entry.line_bytes = 1;
        }
    }

    Ok(index)
}

/// Check if a file is gzip-compressed by reading its magic bytes
fn is_gzip_file<P: AsRef<Path>>(path: P) -> Result<bool, FerroError> {
    let mut file = File::open(path.as_ref())?;

    let mut magic = [0u8; 2];
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(magic == [0x1f, 0x8b]),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// FASTA provider with an LRU cache in front of region lookups
///
/// Sites within the same feature often ask for the same few bases; caching
/// avoids repeated seeks.
pub struct CachedFastaProvider {
    inner: FastaProvider,
    /// (contig, start, end) -> sequence
    cache: LruCache<(String, u64, u64), String>,
}

impl CachedFastaProvider {
    /// Wrap a provider with a cache holding up to `cache_capacity` regions
    pub fn new(inner: FastaProvider, cache_capacity: usize) -> Self {
        Self {
            inner,
            cache: LruCache::new(cache_capacity),
        }
    }

    /// Open a FASTA file with a cache of [`DEFAULT_CACHE_SIZE`] regions
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FerroError> {
        Ok(Self::new(FastaProvider::new(path)?, DEFAULT_CACHE_SIZE))
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Get the underlying provider
    pub fn inner(&self) -> &FastaProvider {
        &self.inner
    }
}

impl ReferenceProvider for CachedFastaProvider {
    fn get_sequence(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError> {
        let key = (contig.to_string(), start, end);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let sequence = self.inner.get_sequence(contig, start, end)?;
        self.cache.insert(key, sequence.clone());
        Ok(sequence)
    }

    fn contig_length(&self, contig: &str) -> Option<u64> {
        self.inner.contig_length(contig)
    }
}
