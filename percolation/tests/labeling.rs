use std::collections::{HashMap, VecDeque};

use percolation::{
    label_clusters, ClusterLabeler, ClusterMap, Error, LabelForest, Lattice, PictureError,
    TrialResult,
};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

////////////////////////////////////////////////////////////////////////////////

fn picture(s: &str) -> Lattice {
    s.parse().unwrap()
}

fn map_rows(map: &ClusterMap) -> Vec<Vec<usize>> {
    map.labels().rows().map(|r| r.to_vec()).collect()
}

/// Component id of every open site, found by flood fill.
fn flood_fill(lattice: &Lattice) -> HashMap<(usize, usize), usize> {
    let mut component = HashMap::new();
    let mut next = 0;
    for row in 0..lattice.size() {
        for col in 0..lattice.size() {
            if !lattice.is_open(row, col) || component.contains_key(&(row, col)) {
                continue;
            }
            let mut queue = VecDeque::from([(row, col)]);
            component.insert((row, col), next);
            while let Some((r, c)) = queue.pop_front() {
                for nb in lattice.neighbours(r, c) {
                    if !component.contains_key(&nb) {
                        component.insert(nb, next);
                        queue.push_back(nb);
                    }
                }
            }
            next += 1;
        }
    }
    component
}

fn random_lattices() -> impl Iterator<Item = Lattice> {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    [1, 2, 3, 5, 8, 13, 21, 32]
        .into_iter()
        .flat_map(|size| [0.3, 0.5, 0.593, 0.7].map(|p| (size, p)))
        .flat_map(|(size, p)| vec![(size, p); 5])
        .map(move |(size, p)| Lattice::random(size, p, &mut rng).unwrap())
        .collect::<Vec<_>>()
        .into_iter()
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn four_by_four_column_cluster() {
    let cells = [(0, 0), (0, 1), (1, 1), (2, 1), (3, 1), (3, 2)];
    let lattice = Lattice::from_open_cells(4, cells).unwrap();
    let map = label_clusters(&lattice);

    // (3, 2) touches (3, 1), so everything is one cluster
    assert_eq!(
        map_rows(&map),
        vec![
            vec![1, 1, 0, 0],
            vec![0, 1, 0, 0],
            vec![0, 1, 0, 0],
            vec![0, 1, 1, 0],
        ]
    );
    assert_eq!(
        map.summary(),
        TrialResult {
            percolates: true,
            largest_cluster_size: 6,
            percolating_cluster_size: 6,
        }
    );
}

#[test]
fn four_by_four_with_isolated_site() {
    let cells = [(0, 0), (0, 1), (1, 1), (2, 1), (3, 1), (3, 3)];
    let lattice = Lattice::from_open_cells(4, cells).unwrap();
    let map = label_clusters(&lattice);

    assert_eq!(map.cluster_count(), 2);
    assert_eq!(map.cluster_sizes().into_iter().collect::<Vec<_>>(), vec![(1, 5), (2, 1)]);
    assert_ne!(map.label(3, 3), map.label(0, 0));
    assert_eq!(map.spanning_labels().into_iter().collect::<Vec<_>>(), vec![1]);
    assert_eq!(
        map.summary(),
        TrialResult {
            percolates: true,
            largest_cluster_size: 5,
            percolating_cluster_size: 5,
        }
    );
}

#[test]
fn closed_two_by_two() {
    let map = label_clusters(&Lattice::closed(2).unwrap());
    assert_eq!(map_rows(&map), vec![vec![0, 0], vec![0, 0]]);
    assert!(!map.percolates());
    assert_eq!(map.largest_cluster_size(), 0);
    assert_eq!(map.percolating_cluster(), None);
    assert_eq!(map.percolating_cluster_size(), 0);
}

#[test]
fn extremes() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for size in 1..=12 {
        let closed = label_clusters(&Lattice::random(size, 0.0, &mut rng).unwrap());
        assert_eq!(closed.summary(), TrialResult::default());

        let open = label_clusters(&Lattice::random(size, 1.0, &mut rng).unwrap());
        assert_eq!(open.cluster_count(), 1);
        assert_eq!(open.roots().into_iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(
            open.summary(),
            TrialResult {
                percolates: true,
                largest_cluster_size: size * size,
                percolating_cluster_size: size * size,
            }
        );
    }
}

#[test]
fn single_site() {
    let open = label_clusters(&picture("#"));
    assert!(open.percolates());
    assert_eq!(open.percolating_cluster(), Some((1, 1)));

    let closed = label_clusters(&picture("."));
    assert!(!closed.percolates());
    assert_eq!(closed.largest_cluster_size(), 0);
}

#[test]
fn late_merge_takes_smallest_label() {
    let lattice = picture(
        "
        #.#
        #.#
        ###
        ",
    );
    let mut labeler = ClusterLabeler::new(3);
    labeler.scan(&lattice).unwrap();
    assert_eq!(labeler.provisional_label_count(), 2);
    assert_eq!(labeler.raw_labels().row(0), &[1, 0, 2]);
    assert_eq!(labeler.raw_labels().row(2), &[1, 1, 1]);

    let map = labeler.resolve();
    assert_eq!(
        map_rows(&map),
        vec![vec![1, 0, 1], vec![1, 0, 1], vec![1, 1, 1]]
    );
}

#[test]
fn comb_merges_every_tooth() {
    let lattice = picture(
        "
        #.#.#
        #.#.#
        #.#.#
        #.#.#
        #####
        ",
    );
    let map = label_clusters(&lattice);
    assert_eq!(map.roots().into_iter().collect::<Vec<_>>(), vec![1]);
    assert_eq!(map.cluster_size(1), 17);
}

#[test]
fn staircase_links_labels_transitively() {
    // four branches that only meet further down
    let lattice = picture(
        "
        .#.#.#
        .#.#.#
        ##.#.#
        .###.#
        ...###
        ......
        ",
    );
    let mut labeler = ClusterLabeler::new(6);
    let map = labeler.label(&lattice).unwrap();
    assert_eq!(labeler.provisional_label_count(), 4);
    assert_eq!(map.cluster_count(), 1);
    assert_eq!(map.cluster_size(1), lattice.open_count());
    assert!(!map.percolates());
}

#[test]
fn checkerboard_is_all_singletons() {
    let size = 7;
    let cells = (0..size)
        .flat_map(|r| (0..size).map(move |c| (r, c)))
        .filter(|(r, c)| (r + c) % 2 == 0);
    let lattice = Lattice::from_open_cells(size, cells).unwrap();

    let mut labeler = ClusterLabeler::new(size);
    let map = labeler.label(&lattice).unwrap();
    assert_eq!(labeler.provisional_label_count(), (size * size + 1) / 2);
    assert_eq!(map.cluster_count(), (size * size + 1) / 2);
    assert_eq!(map.largest_cluster_size(), 1);
    assert!(!map.percolates());
}

#[test]
fn largest_spanning_cluster_wins() {
    let map = label_clusters(&picture(
        "
        #.##
        #.##
        #.##
        #.##
        ",
    ));
    assert_eq!(map.spanning_labels().len(), 2);
    assert_eq!(map.percolating_cluster(), Some((2, 8)));
    assert_eq!(map.percolating_cluster_size(), 8);
}

#[test]
fn equal_spanning_clusters_pick_smallest_label() {
    let map = label_clusters(&picture(
        "
        #.#
        #.#
        #.#
        ",
    ));
    assert_eq!(map.percolating_cluster(), Some((1, 3)));
}

#[test]
fn conservation() {
    for lattice in random_lattices() {
        let map = label_clusters(&lattice);
        let total = map.cluster_sizes().values().sum::<usize>();
        assert_eq!(total, lattice.open_count());
    }
}

#[test]
fn labels_match_flood_fill() {
    for lattice in random_lattices() {
        let map = label_clusters(&lattice);
        let components = flood_fill(&lattice);

        let mut label_of = HashMap::new();
        let mut component_of = HashMap::new();
        for (&(row, col), &component) in &components {
            let label = map.label(row, col);
            assert_ne!(label, 0);
            assert_eq!(*label_of.entry(component).or_insert(label), label);
            assert_eq!(*component_of.entry(label).or_insert(component), component);
        }
        for row in 0..lattice.size() {
            for col in 0..lattice.size() {
                assert_eq!(map.label(row, col) == 0, !lattice.is_open(row, col));
            }
        }
    }
}

#[test]
fn percolation_matches_search() {
    for lattice in random_lattices() {
        assert_eq!(label_clusters(&lattice).percolates(), lattice.spans());
    }
}

#[test]
fn summary_agrees_with_metrics() {
    for lattice in random_lattices() {
        let map = label_clusters(&lattice);
        assert_eq!(
            map.summary(),
            TrialResult {
                percolates: map.percolates(),
                largest_cluster_size: map.largest_cluster_size(),
                percolating_cluster_size: map.percolating_cluster_size(),
            }
        );
    }

    let two_spanning = picture(
        "
        #.##
        #.##
        #.##
        #.#.
    ",
    );
    assert_eq!(
        label_clusters(&two_spanning).summary(),
        TrialResult {
            percolates: true,
            largest_cluster_size: 7,
            percolating_cluster_size: 7,
        }
    );
}

#[test]
fn resolving_twice_changes_nothing() {
    let mut labeler = ClusterLabeler::new(21);
    for lattice in random_lattices().filter(|l| l.size() == 21) {
        let first = labeler.label(&lattice).unwrap();
        let second = labeler.resolve();
        assert_eq!(first, second);
        for root in first.roots() {
            assert_eq!(labeler.root(root), root);
        }
    }
}

#[test]
fn labeler_is_reusable() {
    let mut labeler = ClusterLabeler::new(3);
    let first = labeler.label(&picture("###\n...\n###")).unwrap();
    assert_eq!(first.cluster_count(), 2);

    let second = labeler.label(&picture("#..\n#..\n#..")).unwrap();
    assert_eq!(map_rows(&second), vec![vec![1, 0, 0]; 3]);
    assert_eq!(labeler.provisional_label_count(), 1);
}

#[test]
fn labeler_rejects_other_sizes() {
    let mut labeler = ClusterLabeler::new(4);
    assert_eq!(
        labeler.label(&Lattice::closed(5).unwrap()).unwrap_err(),
        Error::DimensionMismatch {
            expected: 4,
            got: 5
        }
    );
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn forest_roots_are_minimal_labels() {
    let mut forest = LabelForest::new();
    let labels = (0..6).map(|_| forest.make_label()).collect::<Vec<_>>();
    assert_eq!(labels, vec![1, 2, 3, 4, 5, 6]);

    assert_eq!(forest.union(5, 6), 5);
    assert_eq!(forest.union(4, 6), 4);
    assert_eq!(forest.union(6, 2), 2);
    assert!(forest.same_class(4, 5));
    assert!(!forest.same_class(1, 3));
    for label in [2, 4, 5, 6] {
        assert_eq!(forest.root(label), 2);
    }
    assert_eq!(forest.root(3), 3);

    forest.reset();
    assert!(forest.is_empty());
    assert_eq!(forest.make_label(), 1);
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn lattice_constructors_validate() {
    assert_eq!(Lattice::closed(0).unwrap_err(), Error::InvalidSize);

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert_eq!(
        Lattice::random(3, 1.5, &mut rng).unwrap_err(),
        Error::InvalidProbability(1.5)
    );
    assert!(matches!(
        Lattice::random(3, f64::NAN, &mut rng),
        Err(Error::InvalidProbability(_))
    ));
    assert_eq!(
        Lattice::from_open_cells(3, [(1, 3)]).unwrap_err(),
        Error::CellOutOfBounds {
            row: 1,
            col: 3,
            size: 3
        }
    );
}

#[test]
fn picture_errors() {
    assert_eq!(
        "".parse::<Lattice>().unwrap_err(),
        Error::InvalidPicture(PictureError::Empty)
    );
    assert_eq!(
        "##\n#".parse::<Lattice>().unwrap_err(),
        Error::InvalidPicture(PictureError::RaggedRow {
            row: 1,
            expected: 2,
            got: 1
        })
    );
    assert_eq!(
        "#.\n#x".parse::<Lattice>().unwrap_err(),
        Error::InvalidPicture(PictureError::UnexpectedChar {
            ch: 'x',
            row: 1,
            col: 1
        })
    );
}

#[test]
fn display_draws_sites() {
    let lattice = Lattice::from_open_cells(3, [(0, 0), (1, 1), (2, 2)]).unwrap();
    assert_eq!(lattice.to_string(), "#..\n.#.\n..#\n");
    assert_eq!(lattice.to_string().parse::<Lattice>().unwrap(), lattice);

    let map = label_clusters(&picture("##.\n...\n.##"));
    assert_eq!(map.to_string(), "1 1 0\n0 0 0\n0 2 2\n");
}
