//! Axis-aligned box selection over the catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{CatalogRow, Query, Window};

/// A filterable catalog column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Period,
    Power,
    Magnitude,
    Snr,
}

impl Axis {
    /// Parameter name as used on the command line and in batch files.
    pub fn name(self) -> &'static str {
        match self {
            Axis::Period => "period",
            Axis::Power => "ls",
            Axis::Magnitude => "t",
            Axis::Snr => "snr",
        }
    }

    pub fn value(self, row: &CatalogRow) -> Option<f64> {
        match self {
            Axis::Period => Some(row.true_period),
            Axis::Power => row.power,
            Axis::Magnitude => row.magnitude,
            Axis::Snr => row.snr,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Open-interval constraint on one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBound {
    pub axis: Axis,
    pub center: f64,
    pub window: Window,
}

impl AxisBound {
    pub fn new(axis: Axis, center: f64, window: Window) -> Self {
        Self { axis, center, window }
    }

    /// Rows with no value on this axis never pass.
    pub fn admits(&self, row: &CatalogRow) -> bool {
        self.axis
            .value(row)
            .is_some_and(|v| self.window.contains(self.center, v))
    }
}

/// Intersection of per-axis bounds. An empty filter admits every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxFilter {
    bounds: Vec<AxisBound>,
}

impl BoxFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, bound: AxisBound) -> Self {
        self.bounds.push(bound);
        self
    }

    /// Period axis only.
    pub fn period(query: &Query) -> Self {
        Self::new().with(AxisBound::new(
            Axis::Period,
            query.input_period,
            query.period_window,
        ))
    }

    /// Every supplied auxiliary axis, without the period.
    pub fn auxiliary(query: &Query) -> Self {
        query
            .auxiliary()
            .fold(Self::new(), |filter, (axis, aux)| {
                filter.with(AxisBound::new(axis, aux.value, aux.window))
            })
    }

    /// Period plus every supplied auxiliary axis.
    pub fn full(query: &Query) -> Self {
        let mut filter = Self::period(query);
        filter.bounds.extend(Self::auxiliary(query).bounds);
        filter
    }

    pub fn bounds(&self) -> &[AxisBound] {
        &self.bounds
    }

    pub fn contains(&self, row: &CatalogRow) -> bool {
        self.bounds.iter().all(|b| b.admits(row))
    }

    /// Rows inside the box, in input order.
    pub fn apply<'a, I>(&self, rows: I) -> Vec<&'a CatalogRow>
    where
        I: IntoIterator<Item = &'a CatalogRow>,
    {
        rows.into_iter().filter(|row| self.contains(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Catalog, Mode, Status};

    fn row(period: f64, power: Option<f64>, snr: Option<f64>) -> CatalogRow {
        CatalogRow {
            true_period: period,
            power,
            magnitude: Some(10.0),
            snr,
            status: Status::Match,
        }
    }

    #[test]
    fn test_empty_filter_admits_all() {
        let catalog: Catalog = vec![row(1.0, None, None), row(f64::NAN, None, None)]
            .into_iter()
            .collect();
        assert_eq!(BoxFilter::new().apply(&catalog).len(), 2);
    }

    #[test]
    fn test_missing_values_are_excluded() {
        let catalog: Catalog = vec![
            row(9.0, Some(0.1), None),
            row(9.0, None, None),
            row(9.0, Some(f64::NAN), None),
        ]
        .into_iter()
        .collect();

        let filter = BoxFilter::new().with(AxisBound::new(
            Axis::Power,
            0.1,
            Window::symmetric(0.05),
        ));
        let kept = filter.apply(&catalog);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].power, Some(0.1));
    }

    #[test]
    fn test_nan_period_never_in_box() {
        let catalog: Catalog = vec![row(f64::NAN, Some(0.1), None)].into_iter().collect();
        let query = Query::new(9.0, Mode::Match).with_power(0.1, Window::symmetric(0.05));
        assert!(BoxFilter::full(&query).apply(&catalog).is_empty());
    }

    #[test]
    fn test_axis_order_does_not_change_result() {
        let catalog: Catalog = vec![
            row(9.0, Some(0.1), Some(5.0)),
            row(9.2, Some(0.12), Some(9.0)),
            row(8.7, Some(0.3), Some(5.5)),
            row(9.9, Some(0.09), Some(4.0)),
        ]
        .into_iter()
        .collect();

        let power = AxisBound::new(Axis::Power, 0.1, Window::symmetric(0.05));
        let snr = AxisBound::new(Axis::Snr, 5.0, Window::symmetric(2.5));

        let a = BoxFilter::new().with(power).with(snr).apply(&catalog);
        let b = BoxFilter::new().with(snr).with(power).apply(&catalog);
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_full_filter_bounds() {
        let query = Query::new(9.0, Mode::Match)
            .with_power(0.1, Window::symmetric(0.05))
            .with_snr(5.0, Window::new(1.0, 2.0));

        let axes: Vec<Axis> = BoxFilter::full(&query).bounds().iter().map(|b| b.axis).collect();
        assert_eq!(axes, vec![Axis::Period, Axis::Power, Axis::Snr]);
        assert_eq!(BoxFilter::auxiliary(&query).bounds().len(), 2);
        assert_eq!(BoxFilter::period(&query).bounds().len(), 1);
    }

    #[test]
    fn test_asymmetric_window() {
        let catalog: Catalog = vec![row(8.5, None, None), row(10.5, None, None)]
            .into_iter()
            .collect();
        let filter = BoxFilter::new().with(AxisBound::new(Axis::Period, 9.0, Window::new(0.25, 2.0)));
        let kept = filter.apply(&catalog);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].true_period, 10.5);
    }
}
