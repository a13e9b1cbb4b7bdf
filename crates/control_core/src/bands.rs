#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub name: &'static str,
    pub min_hz: i64,
    pub max_hz: i64,
    breakpoints: [Option<i64>; 2],
}

impl Band {
    const fn centered(name: &'static str, min_hz: i64, max_hz: i64) -> Self {
        Self {
            name,
            min_hz,
            max_hz,
            breakpoints: [Some((min_hz + max_hz) / 2), None],
        }
    }

    const fn one(name: &'static str, min_hz: i64, max_hz: i64, point: i64) -> Self {
        Self {
            name,
            min_hz,
            max_hz,
            breakpoints: [Some(point), None],
        }
    }

    const fn two(name: &'static str, min_hz: i64, max_hz: i64, low: i64, high: i64) -> Self {
        Self {
            name,
            min_hz,
            max_hz,
            breakpoints: [Some(low), Some(high)],
        }
    }

    pub fn contains(&self, hz: i64) -> bool {
        (self.min_hz..=self.max_hz).contains(&hz)
    }

    pub fn breakpoints(&self) -> impl Iterator<Item = i64> + '_ {
        self.breakpoints.iter().flatten().copied()
    }
}

const fn khz(value: i64) -> i64 {
    value * 1_000
}

pub const BANDS: [Band; 12] = [
    Band::centered("160m", khz(1_800), khz(2_000)),
    Band::two("80m", khz(3_500), khz(4_000), khz(3_525), khz(3_800)),
    Band::one("60m", 5_330_500, 5_407_500, 5_358_500),
    Band::two("40m", khz(7_000), khz(7_300), khz(7_025), khz(7_175)),
    Band::centered("30m", khz(10_100), khz(10_150)),
    Band::two("20m", khz(14_000), khz(14_350), khz(14_025), khz(14_225)),
    Band::one("17m", khz(18_068), khz(18_168), khz(18_110)),
    Band::two("15m", khz(21_000), khz(21_450), khz(21_025), khz(21_275)),
    Band::one("12m", khz(24_890), khz(24_990), khz(24_930)),
    Band::two("10m", khz(28_000), khz(29_700), khz(28_300), khz(29_000)),
    Band::two("6m", khz(50_000), khz(54_000), khz(50_100), khz(52_000)),
    Band::two("2m", khz(144_000), khz(148_000), khz(144_100), khz(147_000)),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandTable {
    bands: Vec<Band>,
    points: Vec<i64>,
}

impl Default for BandTable {
    fn default() -> Self {
        Self::new(BANDS.to_vec())
    }
}

impl BandTable {
    /// `bands` must be in ascending order with ascending breakpoints.
    pub fn new(bands: Vec<Band>) -> Self {
        let points: Vec<i64> = bands.iter().flat_map(Band::breakpoints).collect();
        debug_assert!(points.windows(2).all(|w| w[0] < w[1]));
        Self { bands, points }
    }

    pub fn points(&self) -> &[i64] {
        &self.points
    }

    pub fn band_for(&self, hz: i64) -> Option<&Band> {
        self.bands.iter().find(|band| band.contains(hz))
    }

    pub fn next_up(&self, hz: i64) -> Option<i64> {
        let idx = self.points.partition_point(|&p| p <= hz);
        self.points
            .get(idx)
            .or_else(|| self.points.first())
            .copied()
    }

    pub fn next_down(&self, hz: i64) -> Option<i64> {
        let idx = self.points.partition_point(|&p| p < hz);
        match idx.checked_sub(1) {
            Some(idx) => self.points.get(idx).copied(),
            None => self.points.last().copied(),
        }
    }
}
