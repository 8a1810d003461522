use crate::models::{CenturyRange, CenturySample, ChurchRecord};

/// Anything that can be placed on the century axis.
pub trait CenturyTagged {
    fn century(&self) -> Option<i32>;
}

impl CenturyTagged for i32 {
    fn century(&self) -> Option<i32> {
        Some(*self)
    }
}

impl CenturyTagged for Option<i32> {
    fn century(&self) -> Option<i32> {
        *self
    }
}

impl CenturyTagged for ChurchRecord {
    fn century(&self) -> Option<i32> {
        self.built_century
    }
}

/// Counts records per century, emitting one sample for every century in
/// `range` (zero where nothing matched).
///
/// Inverted ranges are rejected earlier, by `CenturyRange::new`.
pub fn count_by_century<T: CenturyTagged>(records: &[T], range: CenturyRange) -> Vec<CenturySample> {
    let mut counts = vec![0u64; range.len()];
    let mut skipped = 0usize;
    for record in records {
        match record.century().and_then(|century| range.offset_of(century)) {
            Some(offset) => counts[offset] += 1,
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(
            skipped,
            low = range.low(),
            high = range.high(),
            "records without a century in range were not counted"
        );
    }

    range
        .centuries()
        .zip(counts)
        .map(|(century, count)| CenturySample { century, count })
        .collect()
}
