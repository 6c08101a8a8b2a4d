use crate::core::element::{EdgeCandidate, GraphElement};
use crate::core::graph::GraphStore;
use crate::core::ids::NodeId;
use std::io::BufReader;

#[derive(Debug, Default, PartialEq)]
pub struct CsvStats {
    pub parsed: u64,
    pub skipped: u64,
}

/// Loads a headerless `src,dst` edge list into `store`. Repeated lines become
/// a single stored edge whose count is the number of repetitions.
pub fn ingest_csv<R: std::io::Read, S: GraphStore>(
    reader: R,
    store: &mut S,
) -> anyhow::Result<CsvStats> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(reader));
    let mut stats = CsvStats::default();
    let mut edges = vec![];

    for maybe_record in csv_reader.records() {
        match maybe_record {
            Ok(record) if record.len() == 2 => {
                let src = match record[0].trim().parse::<NodeId>() {
                    Ok(res) => res,
                    Err(_) => {
                        stats.skipped += 1;
                        continue;
                    }
                };
                let dst = match record[1].trim().parse::<NodeId>() {
                    Ok(res) => res,
                    Err(_) => {
                        stats.skipped += 1;
                        continue;
                    }
                };
                edges.push(GraphElement::Edge(EdgeCandidate::new(src, dst)));
                stats.parsed += 1;
            }
            _ => stats.skipped += 1,
        }
    }

    store.ingest(edges)?;
    anyhow::Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::element::EdgeRecord;
    use crate::core::graph::MemoryStore;

    #[test]
    fn test_repeated_lines_become_counts() {
        let input = "3,7\n0,1\n3,7\n3,7\n";
        let mut store = MemoryStore::new(8);

        let stats = ingest_csv(input.as_bytes(), &mut store).unwrap();

        assert_eq!(CsvStats { parsed: 4, skipped: 0 }, stats);
        let edges = store.all_edges().unwrap().collect::<Vec<_>>();
        assert_eq!(
            vec![EdgeRecord::new(0, 1, 1), EdgeRecord::new(3, 7, 3)],
            edges
        );
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let input = "1,2\nfoo,2\n1\n1,2,3\n-1,0\n2,1\n";
        let mut store = MemoryStore::new(4);

        let stats = ingest_csv(input.as_bytes(), &mut store).unwrap();

        assert_eq!(CsvStats { parsed: 2, skipped: 4 }, stats);
        assert_eq!(2, store.distinct_edge_count());
    }

    #[test]
    fn test_store_errors_propagate() {
        let mut store = MemoryStore::new(2);
        let err = ingest_csv("0,1\n5,0\n".as_bytes(), &mut store).unwrap_err();
        assert!(err.to_string().contains("outside the store capacity"));
        assert_eq!(0, store.distinct_edge_count());
    }
}
