//! Image quality heuristics
//!
//! Quality is a JPEG quality percentage. The document-level value is the
//! starting point of the size loop; each section derives its own per-image
//! quality from it.

/// Highest quality; images at this level are not recompressed
pub const MAX_QUALITY: u8 = 100;
/// Lowest quality a section image is ever encoded at
pub const MIN_SECTION_QUALITY: u8 = 80;

/// Starting quality for a document holding `total_images` images
pub fn document_quality(total_images: usize) -> u8 {
    match total_images {
        0..=5 => 100,
        6..=10 => 95,
        11..=15 => 90,
        16..=20 => 85,
        _ => 80,
    }
}

/// Per-image quality for a section holding `section_images` images
///
/// Always within `[MIN_SECTION_QUALITY, MAX_QUALITY]` and non-increasing as
/// the section grows.
pub fn section_quality(document_quality: u8, section_images: usize) -> u8 {
    let base = i64::from(document_quality);
    let quality = match section_images {
        0..=2 => 100,
        3..=4 => (base - 5).max(90),
        n => (base - 10 - 3 * (n as i64 - 4)).max(80),
    };
    quality.clamp(i64::from(MIN_SECTION_QUALITY), i64::from(MAX_QUALITY)) as u8
}

/// Document qualities tried by the size loop, highest first
///
/// Yields `start`, `start - step`, ... while the value stays at or above
/// `floor`.
#[derive(Debug, Clone)]
pub struct QualitySchedule {
    next: Option<u8>,
    step: u8,
    floor: u8,
}

impl QualitySchedule {
    pub fn new(start: u8, step: u8, floor: u8) -> Self {
        let next = (start >= floor).then_some(start.min(MAX_QUALITY));
        Self {
            next,
            step: step.max(1),
            floor,
        }
    }
}

impl Iterator for QualitySchedule {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let current = self.next?;
        self.next = current
            .checked_sub(self.step)
            .filter(|lower| *lower >= self.floor);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_document_quality_thresholds() {
        assert_eq!(document_quality(0), 100);
        assert_eq!(document_quality(5), 100);
        assert_eq!(document_quality(6), 95);
        assert_eq!(document_quality(10), 95);
        assert_eq!(document_quality(15), 90);
        assert_eq!(document_quality(20), 85);
        assert_eq!(document_quality(21), 80);
    }

    #[test]
    fn test_section_quality_rules() {
        assert_eq!(section_quality(95, 1), 100);
        assert_eq!(section_quality(95, 2), 100);
        assert_eq!(section_quality(100, 3), 95);
        assert_eq!(section_quality(90, 4), 90);
        assert_eq!(section_quality(100, 5), 87);
        assert_eq!(section_quality(100, 6), 84);
        assert_eq!(section_quality(85, 5), 80);
        assert_eq!(section_quality(70, 9), 80);
    }

    #[test]
    fn test_schedule_stops_at_floor() {
        let tried: Vec<u8> = QualitySchedule::new(90, 5, 70).collect();
        assert_eq!(tried, vec![90, 85, 80, 75, 70]);
        let tried: Vec<u8> = QualitySchedule::new(82, 5, 70).collect();
        assert_eq!(tried, vec![82, 77, 72]);
        assert_eq!(QualitySchedule::new(60, 5, 70).count(), 0);
        assert_eq!(QualitySchedule::new(3, 5, 0).collect::<Vec<_>>(), vec![3]);
    }

    proptest! {
        #[test]
        fn prop_section_quality_bounded_and_monotone(base in 0u8..=100, n in 0usize..40) {
            let here = section_quality(base, n);
            let next = section_quality(base, n + 1);
            prop_assert!((80..=100).contains(&here));
            prop_assert!(next <= here);
        }
    }
}
