/*
Tracker Module Sample Tables
============================

A 31-sample tracker module starts with a 20 byte title followed by 31
sample records of 30 bytes each:

    offset  size  field
    +0      22    name
    +22     2     length, in 16-bit words, big-endian
    +24     1     finetune
    +25     1     volume
    +26     2     loop start, in words
    +28     2     loop length, in words

so the length of sample `i` (0-based) lives at `42 + 30i`, its loop start at
`46 + 30i` and its loop length at `48 + 30i`. After the records come the
song length (950), restart byte (951), the 128 entry order table
(952..1080) and a 4 byte tag. Pattern data starts at 1084, 1024 bytes per
pattern, and as many patterns are stored as the highest order entry + 1.
Sample data follows the patterns, each sample directly after the previous.

Baking
------

A bake replaces some samples with rendered tones:

    manifest ──→ overrides ──→ sample table ──→ relayout ──→ render each
    (slot, tone)  (headers)     (lengths,        (old data    entry into
                                 offsets)         moved)       its slot

Entries can override a slot's length and loop points. Changing a length
moves every later sample, so the existing sample data is laid out again
against the patched table before the tones are written in.
*/

use std::ops::Range;

use crate::{
    error::{Error, Result},
    io::{
        export::{quantize_i8, to_bytes},
        record::{record_frames, RecordSettings, TRACKER_SAMPLE_RATE},
    },
    voices::{self, ToneDef},
};

pub const SAMPLE_SLOTS: usize = 31;

const SAMPLE_RECORD_SIZE: usize = 30;
const LENGTH_OFFSET: usize = 42;
const LOOP_START_OFFSET: usize = 46;
const LOOP_LENGTH_OFFSET: usize = 48;
const ORDER_TABLE: Range<usize> = 952..1080;
const PATTERN_DATA: usize = 1084;
const PATTERN_SIZE: usize = 1024;

/// Bytes needed to read every sample record.
const HEADER_SIZE: usize = LOOP_LENGTH_OFFSET + SAMPLE_RECORD_SIZE * (SAMPLE_SLOTS - 1) + 2;

fn record_offset(field: usize, slot: usize) -> usize {
    field + SAMPLE_RECORD_SIZE * (slot - 1)
}

fn check_len(module: &[u8], needed: usize) -> Result<()> {
    if module.len() < needed {
        return Err(Error::TruncatedModule {
            len: module.len(),
            needed,
        });
    }
    Ok(())
}

fn check_slot(slot: usize) -> Result<()> {
    if !(1..=SAMPLE_SLOTS).contains(&slot) {
        return Err(Error::SampleSlot {
            slot,
            max: SAMPLE_SLOTS,
        });
    }
    Ok(())
}

fn read_u16_be(module: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([module[offset], module[offset + 1]])
}

/// Store a byte count as a big-endian word count.
fn write_words(module: &mut [u8], offset: usize, bytes: usize) {
    let words = (bytes / 2).min(u16::MAX as usize) as u16;
    module[offset..offset + 2].copy_from_slice(&words.to_be_bytes());
}

/// Where a sample lives in the sample data, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleInfo {
    pub length: usize,
    /// From the start of the sample data.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleTable {
    samples: Vec<SampleInfo>,
}

impl SampleTable {
    /// Collect the 31 sample lengths and their running offsets.
    pub fn read(module: &[u8]) -> Result<Self> {
        check_len(module, HEADER_SIZE)?;

        let mut offset = 0;
        let samples = (1..=SAMPLE_SLOTS)
            .map(|slot| {
                let length = read_u16_be(module, record_offset(LENGTH_OFFSET, slot)) as usize * 2;
                let info = SampleInfo { length, offset };
                offset += length;
                info
            })
            .collect();
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[SampleInfo] {
        &self.samples
    }

    /// Sample `slot`, numbered from 1 as trackers do.
    pub fn get(&self, slot: usize) -> Result<SampleInfo> {
        check_slot(slot)?;
        Ok(self.samples[slot - 1])
    }

    /// Bytes of sample data the table describes.
    pub fn total_length(&self) -> usize {
        self.samples.iter().map(|s| s.length).sum()
    }
}

/// Byte offset of the sample data: after the header and every stored
/// pattern.
pub fn sample_data_offset(module: &[u8]) -> Result<usize> {
    check_len(module, PATTERN_DATA)?;
    let patterns = module[ORDER_TABLE].iter().copied().max().unwrap_or(0) as usize + 1;
    Ok(PATTERN_DATA + patterns * PATTERN_SIZE)
}

/// Lay `data`, arranged by `old`, out again by `new`.
///
/// Each sample keeps its leading bytes and is cut or zero-padded to its new
/// length. Bytes past the end of the old table are kept at the end.
pub fn relayout(data: &[u8], old: &SampleTable, new: &SampleTable) -> Vec<u8> {
    let trailing = data.get(old.total_length()..).unwrap_or_default();
    let mut out = vec![0u8; new.total_length()];

    for (before, after) in old.samples().iter().zip(new.samples()) {
        let available = data.len().saturating_sub(before.offset).min(before.length);
        let copied = available.min(after.length);
        if copied > 0 {
            out[after.offset..after.offset + copied]
                .copy_from_slice(&data[before.offset..before.offset + copied]);
        }
    }

    out.extend_from_slice(trailing);
    out
}

/// One slot to replace, and with what.
#[derive(Debug, Clone)]
pub struct ManifestEntry {
    /// Sample number, from 1.
    pub slot: usize,
    pub tone: ToneDef,
    /// New length in bytes.
    pub samples: Option<usize>,
    /// New loop start in bytes.
    pub repeat: Option<usize>,
    /// New loop length in bytes.
    pub replen: Option<usize>,
    /// Render rate; the pipeline's rate when unset.
    pub sample_rate: Option<f32>,
}

impl ManifestEntry {
    pub fn new(slot: usize, tone: ToneDef) -> Self {
        Self {
            slot,
            tone,
            samples: None,
            repeat: None,
            replen: None,
            sample_rate: None,
        }
    }
}

/// The catalogue tones in the slots they were designed for.
pub fn default_manifest() -> Result<Vec<ManifestEntry>> {
    let slots = [
        (0x06, "pad", Some(0xfffe)),
        (0x08, "bass", None),
        (0x09, "optical", None),
        (0x0a, "rubberband", None),
        (0x0b, "cowbell", None),
        (0x0d, "kitten", None),
        (0x0e, "peyow", None),
        (0x0f, "ground_loop", None),
        (0x10, "click", None),
        (0x16, "reese", None),
    ];
    slots
        .into_iter()
        .map(|(slot, name, samples)| {
            let tone = voices::find(name).ok_or_else(|| Error::UnknownTone(name.to_string()))?;
            Ok(ManifestEntry {
                samples,
                ..ManifestEntry::new(slot, tone)
            })
        })
        .collect()
}

/// Renders manifest tones into a module's sample slots.
#[derive(Debug, Clone)]
pub struct BakePipeline {
    manifest: Vec<ManifestEntry>,
    sample_rate: f32,
    seed: u64,
}

impl BakePipeline {
    pub fn new(mut manifest: Vec<ManifestEntry>) -> Self {
        manifest.sort_by_key(|entry| entry.slot);
        Self {
            manifest,
            sample_rate: TRACKER_SAMPLE_RATE,
            seed: 0,
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Entries in slot order.
    pub fn manifest(&self) -> &[ManifestEntry] {
        &self.manifest
    }

    /// Patch the length and loop headers of every entry with overrides.
    pub fn write_overrides(&self, module: &mut [u8]) -> Result<()> {
        check_len(module, HEADER_SIZE)?;
        for entry in &self.manifest {
            check_slot(entry.slot)?;
            let fields = [
                (LENGTH_OFFSET, entry.samples),
                (LOOP_START_OFFSET, entry.repeat),
                (LOOP_LENGTH_OFFSET, entry.replen),
            ];
            for (field, bytes) in fields {
                if let Some(bytes) = bytes {
                    write_words(module, record_offset(field, entry.slot), bytes);
                }
            }
        }
        Ok(())
    }

    /// Render every entry with the offline recorder and return the patched
    /// module.
    pub fn bake(&self, module: &[u8]) -> Result<Vec<u8>> {
        self.bake_with(module, |entry, frames| {
            let settings = RecordSettings {
                sample_rate: entry.sample_rate.unwrap_or(self.sample_rate),
                frequency: entry.tone.frequency,
                release_after: entry.tone.release_after,
                seed: self.seed,
                ..Default::default()
            };
            record_frames(&entry.tone.build, &settings, frames)
        })
    }

    /// Like [`BakePipeline::bake`], with the rendering supplied by the
    /// caller. `render` receives each entry and the frame count of its slot.
    pub fn bake_with<R>(&self, module: &[u8], mut render: R) -> Result<Vec<u8>>
    where
        R: FnMut(&ManifestEntry, usize) -> Result<Vec<f32>>,
    {
        for entry in &self.manifest {
            check_slot(entry.slot)?;
        }
        let original = SampleTable::read(module)?;
        let data_start = sample_data_offset(module)?;

        let mut patched = module.to_vec();
        self.write_overrides(&mut patched)?;
        let table = SampleTable::read(&patched)?;

        let mut data = relayout(&module[data_start.min(module.len())..], &original, &table);

        for entry in &self.manifest {
            let info = table.get(entry.slot)?;
            tracing::info!(
                "Baking `{}` into sample {} ({} bytes at {})",
                entry.tone.name,
                entry.slot,
                info.length,
                info.offset
            );
            let mut samples = to_bytes(&quantize_i8(&render(entry, info.length)?));
            samples.resize(info.length, 0);
            data[info.offset..info.offset + info.length].copy_from_slice(&samples);
        }

        patched.truncate(data_start);
        patched.resize(data_start, 0);
        patched.extend_from_slice(&data);
        Ok(patched)
    }
}
