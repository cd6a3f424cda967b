/// Policy for samples requested outside `[0, len)`.
#[derive(Debug, Clone, PartialEq)]
pub enum BorderMode<T> {
    Clamp,
    Constant(T),
    /// `cba|abcd|dcb`
    Reflect,
    /// `dcb|abcd|cba`
    Reflect101,
}

/// Maps a possibly out-of-range index into `[0, len)`.
///
/// Returns `None` for [`BorderMode::Constant`] (the caller substitutes the
/// fill value) and for empty ranges.
pub fn map_index<T>(i: isize, len: usize, mode: &BorderMode<T>) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match mode {
        BorderMode::Constant(_) => {
            if i >= 0 && (i as usize) < len {
                Some(i as usize)
            } else {
                None
            }
        }
        BorderMode::Clamp => {
            if i < 0 {
                Some(0)
            } else {
                let idx = i as usize;
                Some(idx.min(len - 1))
            }
        }
        BorderMode::Reflect => {
            let period = (2 * len) as isize;
            let r = i.rem_euclid(period) as usize;
            if r < len {
                Some(r)
            } else {
                Some(2 * len - 1 - r)
            }
        }
        BorderMode::Reflect101 => {
            if len == 1 {
                return Some(0);
            }

            let period = (2 * len - 2) as isize;
            let r = i.rem_euclid(period) as usize;
            if r < len {
                Some(r)
            } else {
                Some((2 * len - 2) - r)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BorderMode, map_index};

    #[test]
    fn clamp_mapping_handles_negative_and_overflow() {
        let mode = BorderMode::<u8>::Clamp;

        assert_eq!(map_index(-3, 5, &mode), Some(0));
        assert_eq!(map_index(-1, 5, &mode), Some(0));
        assert_eq!(map_index(0, 5, &mode), Some(0));
        assert_eq!(map_index(4, 5, &mode), Some(4));
        assert_eq!(map_index(5, 5, &mode), Some(4));
        assert_eq!(map_index(99, 5, &mode), Some(4));
    }

    #[test]
    fn constant_mapping_only_passes_in_range() {
        let mode = BorderMode::Constant(0.0f32);

        assert_eq!(map_index(-1, 3, &mode), None);
        assert_eq!(map_index(0, 3, &mode), Some(0));
        assert_eq!(map_index(2, 3, &mode), Some(2));
        assert_eq!(map_index(3, 3, &mode), None);
    }

    #[test]
    fn reflect_repeats_edge_sample() {
        let mode = BorderMode::<f32>::Reflect;

        for i in -5..=5 {
            assert_eq!(map_index(i, 1, &mode), Some(0));
        }

        let cases_len4 = [
            (-9, 0),
            (-8, 0),
            (-5, 3),
            (-4, 3),
            (-3, 2),
            (-2, 1),
            (-1, 0),
            (0, 0),
            (3, 3),
            (4, 3),
            (5, 2),
            (6, 1),
            (7, 0),
            (8, 0),
            (9, 1),
        ];

        for (i, expected) in cases_len4 {
            assert_eq!(map_index(i, 4, &mode), Some(expected), "i = {i}");
        }
    }

    #[test]
    fn reflect101_len1_len2_len5() {
        let mode = BorderMode::<u8>::Reflect101;

        for i in -8..=8 {
            assert_eq!(map_index(i, 1, &mode), Some(0));
        }

        let expected_len2 = [0, 1, 0, 1, 0, 1, 0, 1, 0];
        for (offset, expected) in (-4..=4).zip(expected_len2) {
            assert_eq!(map_index(offset, 2, &mode), Some(expected));
        }

        let cases_len5 = [
            (-7, 1),
            (-4, 4),
            (-1, 1),
            (0, 0),
            (4, 4),
            (5, 3),
            (7, 1),
        ];

        for (i, expected) in cases_len5 {
            assert_eq!(map_index(i, 5, &mode), Some(expected));
        }
    }

    #[test]
    fn empty_range_never_maps() {
        assert_eq!(map_index(0, 0, &BorderMode::<u8>::Clamp), None);
        assert_eq!(map_index(0, 0, &BorderMode::<u8>::Reflect), None);
        assert_eq!(map_index(0, 0, &BorderMode::<u8>::Reflect101), None);
    }
}
