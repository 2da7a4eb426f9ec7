use crate::topology::{BaseStation, Position};
use rstar::primitives::GeomWithData;
use rstar::RTree;

/// Station centre tagged with its station index.
pub type StationPoint = GeomWithData<Position, usize>;

/// Build an R*-tree over station centres via bulk_load (O(n log n)).
pub fn build_index(stations: &[BaseStation]) -> RTree<StationPoint> {
    RTree::bulk_load(
        stations
            .iter()
            .map(|bs| StationPoint::new(bs.position, bs.index))
            .collect(),
    )
}

/// Index of the station nearest to `point`, or `None` for an empty tree.
///
/// The tree yields candidates in non-decreasing squared distance, but equal distances come
/// back in arbitrary order, so every candidate at the minimum distance is inspected and the
/// lowest index wins.
pub fn nearest_station(tree: &RTree<StationPoint>, point: Position) -> Option<usize> {
    let mut candidates = tree.nearest_neighbor_iter_with_distance_2(&point);
    let (first, best_d2) = candidates.next()?;
    let mut best = first.data;
    for (station, d2) in candidates {
        if d2 > best_d2 {
            break;
        }
        best = best.min(station.data);
    }
    Some(best)
}
