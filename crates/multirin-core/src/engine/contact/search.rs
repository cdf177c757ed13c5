use crate::core::models::atom::Atom;
use crate::engine::config::ContactConfig;

/// Outcome of testing every atom pair between two atom sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Number of pairs within the contact window.
    Count(usize),
    /// Some pair exceeded the too-far cutoff; the residue pair is abandoned.
    TooFar,
}

/// Counts atom pairs at a distance in `[min_distance, max_distance)`.
///
/// Pairs are tested in order and the search stops as soon as one pair lies beyond
/// `too_far_distance`, discarding anything counted so far. A pair where either atom
/// name is in `exclusions` is still measured but never counted.
pub fn count_contacts(
    first: &[&Atom],
    second: &[&Atom],
    config: &ContactConfig,
    exclusions: &[String],
) -> SearchOutcome {
    let is_excluded = |atom: &Atom| exclusions.iter().any(|name| *name == atom.name);
    let mut count = 0;

    for &a in first {
        for &b in second {
            let distance = a.distance_to(b);
            if distance > config.too_far_distance {
                return SearchOutcome::TooFar;
            }
            if distance >= config.min_distance
                && distance < config.max_distance
                && !is_excluded(a)
                && !is_excluded(b)
            {
                count += 1;
            }
        }
    }

    SearchOutcome::Count(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::ResidueId;
    use nalgebra::Point3;

    fn atom(name: &str, x: f64) -> Atom {
        Atom::new(name, ResidueId::default(), Point3::new(x, 0.0, 0.0)).with_alt_loc('A')
    }

    #[test]
    fn window_is_half_open() {
        let config = ContactConfig::default();
        let origin = atom("OG", 0.0);
        let at_cutoff = atom("OD1", 4.0);
        let inside = atom("OD2", 3.999);
        let touching = atom("ND2", 0.0);

        assert_eq!(
            count_contacts(&[&origin], &[&at_cutoff], &config, &[]),
            SearchOutcome::Count(0)
        );
        assert_eq!(
            count_contacts(&[&origin], &[&inside], &config, &[]),
            SearchOutcome::Count(1)
        );
        assert_eq!(
            count_contacts(&[&origin], &[&touching, &inside, &at_cutoff], &config, &[]),
            SearchOutcome::Count(2)
        );
    }

    #[test]
    fn too_far_pair_abandons_search_even_after_contacts() {
        let config = ContactConfig::default();
        let origin = atom("OG", 0.0);
        let close = atom("OD1", 2.0);
        let far = atom("OD2", 26.0);

        assert_eq!(
            count_contacts(&[&origin], &[&close, &far], &config, &[]),
            SearchOutcome::TooFar
        );
        assert_eq!(
            count_contacts(&[&origin], &[&far, &close], &config, &[]),
            SearchOutcome::TooFar
        );
    }

    #[test]
    fn exactly_too_far_distance_is_not_abandoned() {
        let config = ContactConfig::default();
        let origin = atom("OG", 0.0);
        let boundary = atom("OD1", 25.0);
        assert_eq!(
            count_contacts(&[&origin], &[&boundary], &config, &[]),
            SearchOutcome::Count(0)
        );
    }

    #[test]
    fn excluded_names_are_never_counted() {
        let config = ContactConfig::default();
        let cb = atom("CB", 0.0);
        let og = atom("OG", 0.0);
        let n = atom("N", 1.5);
        let exclusions = vec!["CB".to_string()];

        assert_eq!(
            count_contacts(&[&cb, &og], &[&n], &config, &exclusions),
            SearchOutcome::Count(1)
        );
        assert_eq!(
            count_contacts(&[&cb, &og], &[&n], &config, &[]),
            SearchOutcome::Count(2)
        );
    }

    #[test]
    fn min_distance_is_inclusive() {
        let config = ContactConfig {
            min_distance: 1.0,
            ..ContactConfig::default()
        };
        let origin = atom("OG", 0.0);
        assert_eq!(
            count_contacts(&[&origin], &[&atom("OD1", 1.0), &atom("OD2", 0.5)], &config, &[]),
            SearchOutcome::Count(1)
        );
    }
}
