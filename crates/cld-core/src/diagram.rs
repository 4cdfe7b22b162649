use crate::error::{Endpoint, Error, Result};
use crate::geom::Size;
use crate::model::{Callout, Edge, Legend, LoopAnnotation, Node, NodeId};
use indexmap::IndexMap;
use serde::Serialize;

/// A validated causal-loop diagram.
///
/// Only [`DiagramBuilder::build`] constructs one, so every edge endpoint is known to exist and
/// no edge has a zero-length chord between node centers.
#[derive(Debug, Clone, Serialize)]
pub struct Diagram {
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
    loops: Vec<LoopAnnotation>,
    callout: Option<Callout>,
    legend: Legend,
    canvas: Size,
}

impl Diagram {
    pub fn builder() -> DiagramBuilder {
        DiagramBuilder::default()
    }

    /// Nodes in declaration order (also the drawing order).
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Resolves both endpoints of an edge. Always `Some` for edges of this diagram.
    pub fn endpoints(&self, edge: &Edge) -> Option<(&Node, &Node)> {
        Some((self.nodes.get(&edge.from)?, self.nodes.get(&edge.to)?))
    }

    pub fn loops(&self) -> &[LoopAnnotation] {
        &self.loops
    }

    pub fn callout(&self) -> Option<&Callout> {
        self.callout.as_ref()
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }
}

#[derive(Debug, Clone)]
pub struct DiagramBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    loops: Vec<LoopAnnotation>,
    callout: Option<Callout>,
    legend: Legend,
    canvas: Size,
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            loops: Vec::new(),
            callout: None,
            legend: Legend::default(),
            canvas: Size::new(800.0, 660.0),
        }
    }
}

impl DiagramBuilder {
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn loop_annotation(mut self, annotation: LoopAnnotation) -> Self {
        self.loops.push(annotation);
        self
    }

    pub fn callout(mut self, callout: Callout) -> Self {
        self.callout = Some(callout);
        self
    }

    pub fn legend(mut self, legend: Legend) -> Self {
        self.legend = legend;
        self
    }

    pub fn canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas = Size::new(width, height);
        self
    }

    /// Validates the tables and freezes them into a [`Diagram`].
    pub fn build(self) -> Result<Diagram> {
        let mut nodes: IndexMap<NodeId, Node> = IndexMap::with_capacity(self.nodes.len());
        for node in self.nodes {
            if !(node.x.is_finite() && node.y.is_finite()) {
                return Err(Error::NonFiniteCoordinate {
                    id: node.id.to_string(),
                });
            }
            if nodes.contains_key(&node.id) {
                return Err(Error::DuplicateNode {
                    id: node.id.to_string(),
                });
            }
            nodes.insert(node.id.clone(), node);
        }

        for (index, edge) in self.edges.iter().enumerate() {
            let Some(from) = nodes.get(&edge.from) else {
                return Err(Error::DanglingEdge {
                    index,
                    endpoint: Endpoint::Source,
                    id: edge.from.to_string(),
                });
            };
            let Some(to) = nodes.get(&edge.to) else {
                return Err(Error::DanglingEdge {
                    index,
                    endpoint: Endpoint::Target,
                    id: edge.to.to_string(),
                });
            };
            if edge.from == edge.to {
                return Err(Error::SelfLoop {
                    index,
                    id: edge.from.to_string(),
                });
            }
            if from.center() == to.center() {
                return Err(Error::CoincidentNodes {
                    index,
                    from: edge.from.to_string(),
                    to: edge.to.to_string(),
                });
            }
            if !edge.curve.is_finite() {
                return Err(Error::NonFiniteCurvature { index });
            }
            if edge.is_curved() && edge.curve.abs() != 1.0 {
                tracing::debug!(
                    index,
                    curve = edge.curve,
                    "only the sign of an edge's curvature affects its bow"
                );
            }
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = self.edges.len(),
            loops = self.loops.len(),
            "diagram validated"
        );

        Ok(Diagram {
            nodes,
            edges: self.edges,
            loops: self.loops,
            callout: self.callout,
            legend: self.legend,
            canvas: self.canvas,
        })
    }
}
