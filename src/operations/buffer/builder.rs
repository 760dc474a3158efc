use std::collections::HashSet;

use tracing::trace;

use crate::algorithm::LineIntersector;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::math::PrecisionModel;
use crate::noding::{IntersectionAdder, McIndexNoder, Noder, SnapRoundingNoder};
use crate::topology::{Edge, EdgeList, Label, PlanarGraph};

use super::curve_builder::OffsetCurveBuilder;
use super::curve_set_builder::{BufferCurve, OffsetCurveSetBuilder};
use super::depth_locater::SubgraphDepthLocater;
use super::parameters::BufferParameters;
use super::polygon_builder::PolygonBuilder;
use super::subgraph::BufferSubgraph;

/// How the raw curves are noded.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Noding {
    /// Monotone-chain noding with intersections rounded to the working
    /// precision model.
    McIndex,
    /// Snap-rounding to a fixed grid.
    SnapRounding { scale: f64 },
}

/// Runs a single buffer computation at one precision.
///
/// # Algorithm
///
/// 1. Build the labelled raw offset curves of the input.
/// 2. Node them and merge coincident edges, summing their depth deltas.
/// 3. Build the planar graph and split it into connected subgraphs.
/// 4. Process subgraphs right to left: each gets its outside depth from
///    the subgraphs already processed, then propagates depths.
/// 5. Link the edges with interior on the right into polygons.
///
/// A topology failure aborts the attempt; the caller decides whether to
/// retry at a coarser precision.
#[derive(Debug, Clone, Copy)]
pub struct BufferBuilder {
    params: BufferParameters,
    pm: PrecisionModel,
    noding: Noding,
}

impl BufferBuilder {
    #[must_use]
    pub fn new(params: BufferParameters) -> Self {
        Self {
            params,
            pm: PrecisionModel::Floating,
            noding: Noding::McIndex,
        }
    }

    /// Sets the precision model used for curve vertices and computed
    /// intersections.
    #[must_use]
    pub fn with_precision(mut self, pm: PrecisionModel) -> Self {
        self.pm = pm;
        self
    }

    /// Switches to snap-rounding on the grid of `pm`. A floating model
    /// keeps monotone-chain noding.
    #[must_use]
    pub fn with_snap_rounding(mut self, pm: PrecisionModel) -> Self {
        self.pm = pm;
        self.noding = match pm.scale() {
            Some(scale) => Noding::SnapRounding { scale },
            None => Noding::McIndex,
        };
        self
    }

    /// Buffers `geom` by `distance`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for invalid parameters or
    /// non-finite coordinates, and a `TopologyError` if noding at this
    /// precision produced an inconsistent graph.
    pub fn buffer(&self, geom: &Geometry, distance: f64) -> Result<Geometry> {
        self.params.validate()?;

        // Step 1: raw curves.
        let curve_builder = OffsetCurveBuilder::new(self.pm, self.params);
        let curves = OffsetCurveSetBuilder::new(geom, distance, curve_builder).curves()?;
        trace!(curves = curves.len(), distance, "built raw offset curves");
        if curves.is_empty() {
            return Ok(Geometry::empty_polygon());
        }

        // Step 2: noding.
        let edges = self.compute_noded_edges(curves);
        trace!(edges = edges.len(), "noded buffer edges");

        // Step 3: graph and subgraphs.
        let mut graph = PlanarGraph::new();
        graph.add_edges(edges.into_edges())?;
        let subgraphs = create_subgraphs(&graph)?;
        trace!(
            nodes = graph.node_count(),
            subgraphs = subgraphs.len(),
            "built buffer graph"
        );

        // Step 4-5: depths and polygons.
        let mut poly_builder = PolygonBuilder::new();
        build_subgraphs(&mut graph, &subgraphs, &mut poly_builder)?;
        let polys = poly_builder.polygons()?;
        trace!(polygons = polys.len(), "assembled buffer polygons");
        Ok(Geometry::from_polygons(polys))
    }

    fn noder(&self) -> Box<dyn Noder<Label>> {
        match self.noding {
            Noding::McIndex => Box::new(McIndexNoder::new(IntersectionAdder::new(LineIntersector::new(self.pm)))),
            Noding::SnapRounding { scale } => Box::new(SnapRoundingNoder::new(scale)),
        }
    }

    fn compute_noded_edges(&self, curves: Vec<BufferCurve>) -> EdgeList {
        let noded = self.noder().compute_nodes(curves);
        let mut edges = EdgeList::new();
        for s in noded {
            let pts = s.coords();
            // Collapsed segments carry no topology.
            if pts.len() == 2 && pts[0] == pts[1] {
                continue;
            }
            edges.insert_unique(Edge::new(pts.to_vec(), *s.data()));
        }
        edges
    }
}

/// Splits the graph into connected subgraphs, ordered right to left by
/// their rightmost coordinate.
fn create_subgraphs(graph: &PlanarGraph) -> Result<Vec<BufferSubgraph>> {
    let mut visited = HashSet::new();
    let mut subgraphs = Vec::new();
    for node_id in graph.node_ids() {
        if !visited.contains(&node_id) {
            subgraphs.push(BufferSubgraph::create(graph, node_id, &mut visited)?);
        }
    }
    subgraphs.sort_by(|a, b| {
        let (pa, pb) = (a.rightmost_coordinate(), b.rightmost_coordinate());
        pb.x.total_cmp(&pa.x).then(pb.y.total_cmp(&pa.y))
    });
    Ok(subgraphs)
}

fn build_subgraphs(
    graph: &mut PlanarGraph,
    subgraphs: &[BufferSubgraph],
    poly_builder: &mut PolygonBuilder,
) -> Result<()> {
    for (i, subgraph) in subgraphs.iter().enumerate() {
        let p = subgraph.rightmost_coordinate();
        let outside_depth = SubgraphDepthLocater::new(graph, &subgraphs[..i]).depth(&p)?;
        subgraph.compute_depth(graph, outside_depth)?;
        subgraph.find_result_edges(graph)?;
        poly_builder.add(graph, subgraph.dir_edges(), subgraph.nodes())?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{LineString, Polygon};
    use crate::math::Coord;
    use crate::operations::buffer::EndCapStyle;
    use crate::topology::Position;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    fn square(x0: f64, y0: f64, size: f64) -> Polygon {
        Polygon::from_rings(vec![vec![
            c(x0, y0),
            c(x0, y0 + size),
            c(x0 + size, y0 + size),
            c(x0 + size, y0),
            c(x0, y0),
        ]])
        .unwrap()
    }

    fn buffer(geom: &Geometry, distance: f64) -> Geometry {
        BufferBuilder::new(BufferParameters::default()).buffer(geom, distance).unwrap()
    }

    /// Runs the buffer up to depth assignment and returns the labelled graph
    /// with its subgraphs.
    fn depth_graph(geom: &Geometry, distance: f64) -> (PlanarGraph, Vec<BufferSubgraph>) {
        let builder = BufferBuilder::new(BufferParameters::default());
        let curve_builder = OffsetCurveBuilder::new(builder.pm, builder.params);
        let curves = OffsetCurveSetBuilder::new(geom, distance, curve_builder).curves().unwrap();
        let mut graph = PlanarGraph::new();
        graph.add_edges(builder.compute_noded_edges(curves).into_edges()).unwrap();
        let subgraphs = create_subgraphs(&graph).unwrap();
        build_subgraphs(&mut graph, &subgraphs, &mut PolygonBuilder::new()).unwrap();
        (graph, subgraphs)
    }

    fn assert_consistent_depths(graph: &PlanarGraph, subgraphs: &[BufferSubgraph]) {
        for subgraph in subgraphs {
            for &id in subgraph.dir_edges() {
                let de = graph.dir_edge(id).unwrap();
                let edge_delta = graph.edge(de.edge()).unwrap().depth_delta();
                let signed_delta = if de.is_forward() { edge_delta } else { -edge_delta };
                let (left, right) = (de.depth(Position::Left), de.depth(Position::Right));
                assert_eq!(de.depth_delta(), signed_delta);
                assert_eq!(left - right, signed_delta, "at {}", de.coordinate());
                assert!(left >= 0 && right >= 0, "at {}", de.coordinate());

                let sym = graph.dir_edge(de.sym()).unwrap();
                assert_eq!(sym.depth(Position::Left), right);
                assert_eq!(sym.depth(Position::Right), left);
            }
        }
    }

    #[test]
    fn holed_polygon_depths_are_consistent() {
        let poly = Polygon::from_rings(vec![
            vec![c(0.0, 0.0), c(0.0, 10.0), c(10.0, 10.0), c(10.0, 0.0), c(0.0, 0.0)],
            vec![c(4.0, 4.0), c(6.0, 4.0), c(6.0, 6.0), c(4.0, 6.0), c(4.0, 4.0)],
        ])
        .unwrap();
        for distance in [-1.0, 0.0, 0.5] {
            let (graph, subgraphs) = depth_graph(&Geometry::Polygon(poly.clone()), distance);
            assert_eq!(subgraphs.len(), 2);
            assert_consistent_depths(&graph, &subgraphs);
        }
    }

    #[test]
    fn overlapping_multipolygon_depths_are_consistent() {
        let geom = Geometry::MultiPolygon(vec![square(0.0, 0.0, 10.0), square(5.0, 5.0, 10.0)]);
        let (graph, subgraphs) = depth_graph(&geom, 0.0);
        assert_eq!(subgraphs.len(), 1);
        assert_consistent_depths(&graph, &subgraphs);
        // The overlap is covered twice.
        let max_depth = subgraphs[0]
            .dir_edges()
            .iter()
            .map(|&id| graph.dir_edge(id).unwrap().depth(Position::Right))
            .max();
        assert_eq!(max_depth, Some(2));
    }

    #[test]
    fn point_buffer_is_inscribed_polygon() {
        let out = buffer(&Geometry::Point(c(0.0, 0.0)), 1.0);
        let area = out.area();
        assert!(area > 3.1 && area < std::f64::consts::PI, "area {area}");
        assert_eq!(out.num_geometries(), 1);
    }

    #[test]
    fn square_grows_by_distance() {
        let out = buffer(&Geometry::Polygon(square(0.0, 0.0, 10.0)), 1.0);
        let area = out.area();
        assert!(area > 143.0 && area < 100.0 + 40.0 + std::f64::consts::PI, "area {area}");
    }

    #[test]
    fn negative_buffer_shrinks_square() {
        let out = buffer(&Geometry::Polygon(square(0.0, 0.0, 10.0)), -1.0);
        assert!((out.area() - 64.0).abs() < 1e-9, "area {}", out.area());
    }

    #[test]
    fn eroded_square_is_empty() {
        let out = buffer(&Geometry::Polygon(square(0.0, 0.0, 10.0)), -6.0);
        assert!(out.is_empty());
    }

    #[test]
    fn overlapping_squares_merge_at_zero_distance() {
        let geom = Geometry::MultiPolygon(vec![square(0.0, 0.0, 10.0), square(5.0, 5.0, 10.0)]);
        let out = buffer(&geom, 0.0);
        assert_eq!(out.num_geometries(), 1);
        assert!((out.area() - 175.0).abs() < 1e-9, "area {}", out.area());
    }

    #[test]
    fn disjoint_buffers_stay_separate() {
        let geom = Geometry::MultiPoint(vec![c(0.0, 0.0), c(10.0, 0.0)]);
        assert_eq!(buffer(&geom, 1.0).num_geometries(), 2);
    }

    #[test]
    fn flat_line_buffer_is_rectangle() {
        let line = Geometry::LineString(LineString::new(vec![c(0.0, 0.0), c(10.0, 0.0)]).unwrap());
        let params = BufferParameters::default().with_end_cap(EndCapStyle::Flat);
        let out = BufferBuilder::new(params).buffer(&line, 2.0).unwrap();
        assert!((out.area() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn snap_rounded_square_buffer() {
        let builder = BufferBuilder::new(BufferParameters::default()).with_snap_rounding(PrecisionModel::fixed(1000.0));
        let out = builder.buffer(&Geometry::Polygon(square(0.0, 0.0, 10.0)), 1.0).unwrap();
        assert!((out.area() - 143.12).abs() < 0.05, "area {}", out.area());
    }
}
