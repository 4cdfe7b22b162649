//! Built-in diagrams.

use crate::diagram::Diagram;
use crate::error::Result;
use crate::model::{Callout, Edge, Legend, LoopAnnotation, LoopKind, Node, Sign};

pub const HOMELESSNESS_PRESENCE: &str = "Homelessness Presence";
pub const PUBLIC_CONCERN: &str = "Public Concern";
pub const GOVERNMENT_ACTION: &str = "Government Action";
pub const TEMPORARY_SHELTERS: &str = "Temporary Shelters";
pub const GOVERNMENT_CAPITAL: &str = "Government Capital";
pub const AFFORDABLE_HOUSING_PROGRAM: &str = "Affordable Housing Program";
pub const HOUSING_INSECURITY: &str = "Housing Insecurity";

/// The "drifting goals" archetype applied to homelessness policy.
///
/// B1 is the short-term loop: homelessness raises public concern, which drives government
/// action and temporary shelters, which reduce visible homelessness. R1 is the long-term loop:
/// shelters draw on the same limited government capital that funds affordable housing, so less
/// housing raises insecurity and, eventually, homelessness.
pub fn drifting_goals() -> Result<Diagram> {
    use Sign::{Negative, Positive};

    Diagram::builder()
        .node(Node::new(HOMELESSNESS_PRESENCE, 150.0, 250.0).with_fill("#FFB6C1"))
        .node(Node::new(PUBLIC_CONCERN, 150.0, 80.0).with_fill("#DDA0DD"))
        .node(Node::new(GOVERNMENT_ACTION, 400.0, 80.0).with_fill("#87CEEB"))
        .node(Node::new(TEMPORARY_SHELTERS, 650.0, 80.0).with_fill("#FFA07A"))
        .node(Node::new(GOVERNMENT_CAPITAL, 650.0, 250.0).with_fill("#FFD700"))
        .node(Node::new(AFFORDABLE_HOUSING_PROGRAM, 650.0, 420.0).with_fill("#90EE90"))
        .node(Node::new(HOUSING_INSECURITY, 400.0, 420.0).with_fill("#FFB6C1"))
        // B1
        .edge(Edge::new(HOMELESSNESS_PRESENCE, PUBLIC_CONCERN, Positive))
        .edge(Edge::new(PUBLIC_CONCERN, GOVERNMENT_ACTION, Positive))
        .edge(Edge::new(GOVERNMENT_ACTION, TEMPORARY_SHELTERS, Positive))
        .edge(
            Edge::new(TEMPORARY_SHELTERS, HOMELESSNESS_PRESENCE, Negative)
                .curved(-0.3)
                .labeled("short-term"),
        )
        .edge(Edge::new(TEMPORARY_SHELTERS, GOVERNMENT_CAPITAL, Negative).labeled("draws from"))
        // R1
        .edge(Edge::new(GOVERNMENT_CAPITAL, AFFORDABLE_HOUSING_PROGRAM, Positive))
        .edge(Edge::new(AFFORDABLE_HOUSING_PROGRAM, HOUSING_INSECURITY, Negative))
        .edge(Edge::new(HOUSING_INSECURITY, HOMELESSNESS_PRESENCE, Positive))
        .loop_annotation(LoopAnnotation {
            kind: LoopKind::Balancing,
            number: 1,
            title: "Short-Term Relief Loop".to_string(),
            description: vec![
                "Temporary shelters reduce visible".to_string(),
                "homelessness & public concern".to_string(),
            ],
            summary: "Temporary shelters reduce visible homelessness (short-term fix)".to_string(),
            x: 400.0,
            y: 140.0,
            color: "#0066CC".to_string(),
        })
        .loop_annotation(LoopAnnotation {
            kind: LoopKind::Reinforcing,
            number: 1,
            title: "Resource Competition Loop".to_string(),
            description: vec![
                "Shelters drain capital from affordable housing,".to_string(),
                "increasing housing insecurity & homelessness".to_string(),
            ],
            summary: "Resource drain leads to more housing insecurity & homelessness".to_string(),
            x: 400.0,
            y: 500.0,
            color: "#CC0066".to_string(),
        })
        .callout(Callout {
            x: 520.0,
            y: 290.0,
            width: 260.0,
            height: 60.0,
            border: "#FFD700".to_string(),
            fill: "#FFFACD".to_string(),
            heading: "DRIFTING GOALS KEY:".to_string(),
            lines: vec![
                "Limited Government Capital forces".to_string(),
                "choice between quick fix & real solution".to_string(),
            ],
        })
        .legend(Legend::default())
        .canvas(800.0, 660.0)
        .build()
}
