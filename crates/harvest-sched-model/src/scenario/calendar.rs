// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::common::{Time, TimeSpan, TimeWindow};

/// One active shift window. Premium windows (night/weekend) are legal to
/// schedule into but carry a rate surcharge in the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    interval: TimeWindow,
    premium: bool,
}

impl ShiftWindow {
    #[inline]
    pub fn new(interval: TimeWindow) -> Self {
        Self {
            interval,
            premium: false,
        }
    }

    #[inline]
    pub fn premium(interval: TimeWindow) -> Self {
        Self {
            interval,
            premium: true,
        }
    }

    #[inline]
    pub fn interval(&self) -> TimeWindow {
        self.interval
    }

    #[inline]
    pub fn is_premium(&self) -> bool {
        self.premium
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyCalendarError;

impl std::fmt::Display for EmptyCalendarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "shift calendar has no non-empty active windows")
    }
}

impl std::error::Error for EmptyCalendarError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictingWindowsError {
    first: TimeWindow,
    second: TimeWindow,
}

impl ConflictingWindowsError {
    pub fn new(first: TimeWindow, second: TimeWindow) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> TimeWindow {
        self.first
    }

    pub fn second(&self) -> TimeWindow {
        self.second
    }
}

impl std::fmt::Display for ConflictingWindowsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "overlapping shift windows {} and {} disagree on premium rate",
            self.first, self.second
        )
    }
}

impl std::error::Error for ConflictingWindowsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    Empty(EmptyCalendarError),
    ConflictingWindows(ConflictingWindowsError),
}

impl std::fmt::Display for CalendarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarError::Empty(e) => write!(f, "{e}"),
            CalendarError::ConflictingWindows(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CalendarError {}

impl From<EmptyCalendarError> for CalendarError {
    #[inline]
    fn from(err: EmptyCalendarError) -> Self {
        CalendarError::Empty(err)
    }
}

impl From<ConflictingWindowsError> for CalendarError {
    #[inline]
    fn from(err: ConflictingWindowsError) -> Self {
        CalendarError::ConflictingWindows(err)
    }
}

/// An ordered set of active shift windows plus blackout intervals.
///
/// Construction normalizes: windows are sorted, same-rate overlapping or
/// touching windows merge, and blackouts are subtracted into the `segments`
/// list that all coverage queries run against.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftCalendar {
    windows: Vec<ShiftWindow>,
    blackouts: Vec<TimeWindow>,
    segments: Vec<ShiftWindow>,
}

impl ShiftCalendar {
    pub fn new<W, B>(windows: W, blackouts: B) -> Result<Self, CalendarError>
    where
        W: IntoIterator<Item = ShiftWindow>,
        B: IntoIterator<Item = TimeWindow>,
    {
        let mut ws: Vec<ShiftWindow> = windows
            .into_iter()
            .filter(|w| !w.interval.is_empty())
            .collect();
        ws.sort_by_key(|w| (w.interval.start(), w.interval.end()));

        let mut merged: Vec<ShiftWindow> = Vec::with_capacity(ws.len());
        for w in ws {
            match merged.last_mut() {
                Some(last) if w.interval.start() < last.interval.end() => {
                    if last.premium != w.premium {
                        return Err(ConflictingWindowsError::new(last.interval, w.interval).into());
                    }
                    let hull = last.interval.hull(&w.interval);
                    last.interval = hull;
                }
                Some(last)
                    if w.interval.start() == last.interval.end() && last.premium == w.premium =>
                {
                    last.interval = last.interval.hull(&w.interval);
                }
                _ => merged.push(w),
            }
        }
        if merged.is_empty() {
            return Err(EmptyCalendarError.into());
        }

        let mut bs: Vec<TimeWindow> = blackouts.into_iter().filter(|b| !b.is_empty()).collect();
        bs.sort_by_key(|b| (b.start(), b.end()));
        let mut merged_bs: Vec<TimeWindow> = Vec::with_capacity(bs.len());
        for b in bs {
            match merged_bs.last_mut() {
                Some(last) if b.start() <= last.end() => *last = last.hull(&b),
                _ => merged_bs.push(b),
            }
        }

        let segments = subtract_blackouts(&merged, &merged_bs);
        Ok(Self {
            windows: merged,
            blackouts: merged_bs,
            segments,
        })
    }

    /// A calendar that is open over one plain window with no blackouts.
    pub fn single(interval: TimeWindow) -> Result<Self, CalendarError> {
        Self::new([ShiftWindow::new(interval)], [])
    }

    #[inline]
    pub fn windows(&self) -> &[ShiftWindow] {
        &self.windows
    }

    #[inline]
    pub fn blackouts(&self) -> &[TimeWindow] {
        &self.blackouts
    }

    /// Active windows with blackouts already punched out.
    #[inline]
    pub fn segments(&self) -> &[ShiftWindow] {
        &self.segments
    }

    /// Total schedulable time.
    pub fn total_open(&self) -> TimeSpan {
        self.segments.iter().map(|s| s.interval.measure()).sum()
    }

    /// Length of the longest contiguous schedulable segment.
    pub fn longest_segment(&self) -> TimeSpan {
        self.segments
            .iter()
            .map(|s| s.interval.measure())
            .fold(TimeSpan::zero(), TimeSpan::max)
    }

    /// Portion of `interval` covered by schedulable segments.
    pub fn covered_overlap(&self, interval: &TimeWindow) -> TimeSpan {
        self.segments
            .iter()
            .map(|s| s.interval.overlap(interval))
            .sum()
    }

    /// Portion of `interval` outside every schedulable segment. This is the
    /// calendar violation magnitude: time in blackouts or outside shifts.
    #[inline]
    pub fn uncovered(&self, interval: &TimeWindow) -> TimeSpan {
        interval.measure() - self.covered_overlap(interval)
    }

    #[inline]
    pub fn covers(&self, interval: &TimeWindow) -> bool {
        self.uncovered(interval).is_zero()
    }

    /// Portion of `interval` falling into premium-rate segments.
    pub fn premium_overlap(&self, interval: &TimeWindow) -> TimeSpan {
        self.segments
            .iter()
            .filter(|s| s.premium)
            .map(|s| s.interval.overlap(interval))
            .sum()
    }

    /// Earliest start `>= not_before` such that a job of `duration` fits
    /// entirely inside one schedulable segment.
    pub fn earliest_fit(&self, not_before: Time, duration: TimeSpan) -> Option<Time> {
        for seg in &self.segments {
            let iv = seg.interval;
            let start = iv.start().max(not_before);
            match start.checked_add(duration) {
                Some(end) if end <= iv.end() => return Some(start),
                _ => {}
            }
        }
        None
    }

    /// Hull over all schedulable segments.
    pub fn horizon(&self) -> Option<TimeWindow> {
        let first = self.segments.first()?.interval;
        let last = self.segments.last()?.interval;
        Some(first.hull(&last))
    }
}

fn subtract_blackouts(windows: &[ShiftWindow], blackouts: &[TimeWindow]) -> Vec<ShiftWindow> {
    let mut out = Vec::with_capacity(windows.len());
    for w in windows {
        let mut cursor = w.interval.start();
        let end = w.interval.end();
        for b in blackouts {
            if b.end() <= cursor {
                continue;
            }
            if b.start() >= end {
                break;
            }
            if b.start() > cursor {
                let piece = TimeWindow::new(cursor, b.start().min(end));
                if !piece.is_empty() {
                    out.push(ShiftWindow {
                        interval: piece,
                        premium: w.premium,
                    });
                }
            }
            cursor = cursor.max(b.end());
            if cursor >= end {
                break;
            }
        }
        if cursor < end {
            out.push(ShiftWindow {
                interval: TimeWindow::new(cursor, end),
                premium: w.premium,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn tp(v: i64) -> Time {
        Time::new(v)
    }

    #[inline]
    fn td(v: i64) -> TimeSpan {
        TimeSpan::new(v)
    }

    #[inline]
    fn iv(a: i64, b: i64) -> TimeWindow {
        TimeWindow::new(tp(a), tp(b))
    }

    #[test]
    fn test_empty_calendar_is_rejected() {
        assert!(matches!(
            ShiftCalendar::new([], []),
            Err(CalendarError::Empty(_))
        ));
        // Only empty windows is just as empty.
        assert!(ShiftCalendar::new([ShiftWindow::new(iv(5, 5))], []).is_err());
    }

    #[test]
    fn test_same_rate_windows_merge() {
        let cal = ShiftCalendar::new(
            [
                ShiftWindow::new(iv(0, 100)),
                ShiftWindow::new(iv(50, 150)),
                ShiftWindow::new(iv(150, 200)),
            ],
            [],
        )
        .unwrap();
        assert_eq!(cal.windows().len(), 1);
        assert_eq!(cal.windows()[0].interval(), iv(0, 200));
    }

    #[test]
    fn test_conflicting_rates_overlapping_rejected() {
        let res = ShiftCalendar::new(
            [ShiftWindow::new(iv(0, 100)), ShiftWindow::premium(iv(50, 150))],
            [],
        );
        assert!(matches!(res, Err(CalendarError::ConflictingWindows(_))));
        // Touching is fine.
        let cal = ShiftCalendar::new(
            [ShiftWindow::new(iv(0, 100)), ShiftWindow::premium(iv(100, 150))],
            [],
        )
        .unwrap();
        assert_eq!(cal.windows().len(), 2);
    }

    #[test]
    fn test_blackouts_punch_segments() {
        let cal = ShiftCalendar::new(
            [ShiftWindow::new(iv(0, 100))],
            [iv(20, 30), iv(28, 40), iv(90, 200)],
        )
        .unwrap();
        let segs: Vec<_> = cal.segments().iter().map(|s| s.interval()).collect();
        assert_eq!(segs, vec![iv(0, 20), iv(40, 90)]);
        assert_eq!(cal.total_open(), td(70));
        assert_eq!(cal.longest_segment(), td(50));
    }

    #[test]
    fn test_coverage_queries() {
        let cal = ShiftCalendar::new([ShiftWindow::new(iv(0, 100))], [iv(40, 60)]).unwrap();
        assert!(cal.covers(&iv(0, 40)));
        assert!(!cal.covers(&iv(30, 50)));
        assert_eq!(cal.uncovered(&iv(30, 70)), td(20));
        assert_eq!(cal.uncovered(&iv(90, 120)), td(20));
    }

    #[test]
    fn test_premium_overlap() {
        let cal = ShiftCalendar::new(
            [ShiftWindow::new(iv(0, 100)), ShiftWindow::premium(iv(100, 200))],
            [],
        )
        .unwrap();
        assert_eq!(cal.premium_overlap(&iv(50, 150)), td(50));
        assert_eq!(cal.premium_overlap(&iv(0, 100)), td(0));
    }

    #[test]
    fn test_earliest_fit() {
        let cal = ShiftCalendar::new([ShiftWindow::new(iv(0, 100))], [iv(40, 60)]).unwrap();
        assert_eq!(cal.earliest_fit(tp(0), td(30)), Some(tp(0)));
        // Does not fit before the blackout from 20 on; next segment opens at 60.
        assert_eq!(cal.earliest_fit(tp(20), td(30)), Some(tp(60)));
        // Too long for any segment.
        assert_eq!(cal.earliest_fit(tp(0), td(45)), None);
    }

    #[test]
    fn test_horizon() {
        let cal = ShiftCalendar::new(
            [ShiftWindow::new(iv(10, 20)), ShiftWindow::new(iv(50, 80))],
            [],
        )
        .unwrap();
        assert_eq!(cal.horizon(), Some(iv(10, 80)));
    }
}
