use std::fmt::Write;

use serde::Serialize;

use crate::catalog::StarId;
use crate::error::{Error, Result};
use crate::report::DistanceReport;
use crate::route::{RouteDescriptor, RouteId};

/// Classifies how the summarised route was produced.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RouteOutputKind {
    /// Best route from a search.
    Route,
    /// One of several ranked alternatives.
    Alternative,
    /// Built by hand, stop by stop.
    Manual,
}

impl RouteOutputKind {
    /// Human-readable label shown in textual renderings.
    pub fn label(self) -> &'static str {
        match self {
            RouteOutputKind::Route => "Route",
            RouteOutputKind::Alternative => "Alternative",
            RouteOutputKind::Manual => "Manual route",
        }
    }
}

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
    /// Compact form for pasting into notes.
    Note,
}

/// Endpoint within a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteEndpoint {
    pub id: StarId,
    pub name: String,
}

/// One stop along a summarised route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub id: StarId,
    pub name: String,
    /// Jump length from the previous step; zero for the first.
    pub jump: f64,
    /// Distance travelled up to and including this step.
    pub cumulative: f64,
}

/// Serialisable view of a [`RouteDescriptor`] for presentation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub kind: RouteOutputKind,
    pub route_id: RouteId,
    pub name: String,
    pub hops: usize,
    pub total_distance: f64,
    pub start: RouteEndpoint,
    pub goal: RouteEndpoint,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    pub fn from_route(kind: RouteOutputKind, route: &RouteDescriptor) -> Result<Self> {
        if route.stops.is_empty() {
            return Err(Error::EmptyRoutePlan);
        }

        let mut cumulative = 0.0;
        let steps = route
            .stops
            .iter()
            .enumerate()
            .map(|(index, stop)| {
                let jump = if index == 0 {
                    0.0
                } else {
                    route.segment_lengths.get(index - 1).copied().unwrap_or(0.0)
                };
                cumulative += jump;
                RouteStep {
                    index,
                    id: stop.id.clone(),
                    name: stop.name.clone(),
                    jump,
                    cumulative,
                }
            })
            .collect::<Vec<_>>();

        let endpoint = |step: &RouteStep| RouteEndpoint {
            id: step.id.clone(),
            name: step.name.clone(),
        };
        let (start, goal) = match (steps.first(), steps.last()) {
            (Some(first), Some(last)) => (endpoint(first), endpoint(last)),
            _ => return Err(Error::EmptyRoutePlan),
        };

        Ok(Self {
            kind,
            route_id: route.id,
            name: route.name.clone(),
            hops: route.hop_count(),
            total_distance: route.total_distance,
            start,
            goal,
            steps,
        })
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
            RouteRenderMode::Note => self.render_note(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "{}: {} -> {} ({} jumps, {:.2} ly)",
            self.kind.label(),
            self.start.name,
            self.goal.name,
            self.hops,
            self.total_distance
        );
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "{:>3}: {} ({}) +{:.2} ly = {:.2} ly",
                step.index, step.name, step.id, step.jump, step.cumulative
            );
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**{}**: _{} → {}_ ({} jumps, `{:.2}` ly)",
            self.kind.label(),
            self.start.name,
            self.goal.name,
            self.hops,
            self.total_distance
        );
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "* {:>2}. **{}** (`{}`) {:.2} ly",
                step.index, step.name, step.id, step.jump
            );
        }
        buffer
    }

    fn render_note(&self) -> String {
        let names = self
            .steps
            .iter()
            .map(|step| step.name.as_str())
            .collect::<Vec<_>>()
            .join(" > ");
        format!("{} ({:.2} ly): {}\n", self.name, self.total_distance, names)
    }
}

/// Plain-text table of a distance report, closest first.
pub fn render_distance_report(report: &DistanceReport, limit: Option<usize>) -> String {
    let entries = match limit {
        Some(limit) => report.nearest(limit),
        None => report.get_distance_list(),
    };

    let mut buffer = String::new();
    if let Some(first) = entries.first() {
        let _ = writeln!(buffer, "Distances from {}:", first.from_name);
    }
    for (rank, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            buffer,
            "{:>3}. {:<24} {:>10.2} ly",
            rank + 1,
            entry.to_name,
            entry.distance
        );
    }
    buffer
}
