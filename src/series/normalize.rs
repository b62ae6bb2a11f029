//! Resize per-fleet series and tables to a requested row count

use crate::series::row::SeriesRow;
use rand::Rng;
use rustc_hash::FxHashSet;

/// Most rows a per-fleet series may hold
pub const MAX_SERIES_ROWS: usize = 50;

/// Most rows an event table may hold
pub const MAX_TABLE_ROWS: usize = 100;

/// First numeric id handed to synthesized fleets
pub const FALLBACK_NAME_START: u32 = 7050;

/// Hands out names that are not taken yet
struct NamePool {
    taken: FxHashSet<String>,
    next_id: u32,
}

impl NamePool {
    fn new<'a>(taken: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            taken: taken.into_iter().map(str::to_string).collect(),
            next_id: FALLBACK_NAME_START,
        }
    }

    /// `preferred` when usable, otherwise the next free numeric id
    fn claim(&mut self, preferred: Option<&str>) -> String {
        let name = match preferred.map(str::trim) {
            Some(name) if !name.is_empty() && !self.taken.contains(name) => name.to_string(),
            _ => loop {
                let candidate = self.next_id.to_string();
                self.next_id += 1;
                if !self.taken.contains(&candidate) {
                    break candidate;
                }
            },
        };
        self.taken.insert(name.clone());
        name
    }
}

/// Resolve display names for `count` fleets.
///
/// Base names are used in order; blank or missing ones fall back to numeric
/// ids starting at 7050.
pub fn fleet_names<S: AsRef<str>>(base_names: &[S], count: usize) -> Vec<String> {
    let count = count.min(MAX_SERIES_ROWS);
    let mut pool = NamePool::new(
        base_names
            .iter()
            .take(count)
            .map(|name| name.as_ref())
            .filter(|name| !name.trim().is_empty()),
    );

    (0..count)
        .map(|index| match base_names.get(index).map(|name| name.as_ref()) {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => pool.claim(None),
        })
        .collect()
}

/// Produce exactly `min(target_count, 50)` rows.
///
/// Base rows are kept in order and only have missing fields filled. Rows past
/// the base come from `fallback(name, index)`, are named `names[index]` when
/// that name is free (else a numeric id) and get synthesized values.
pub fn normalize<T, F, R>(
    base: &[T],
    target_count: usize,
    names: &[String],
    fallback: F,
    rng: &mut R,
) -> Vec<T>
where
    T: SeriesRow,
    F: Fn(&str, usize) -> T,
    R: Rng + ?Sized,
{
    let count = target_count.min(MAX_SERIES_ROWS);
    if count < target_count {
        log::warn!(
            "series of {} rows requested, clamped to {}",
            target_count,
            MAX_SERIES_ROWS
        );
    }

    let mut pool = NamePool::new(base.iter().take(count).map(SeriesRow::name));
    let mut rows = Vec::with_capacity(count);

    for index in 0..count {
        let row = match base.get(index) {
            Some(row) => {
                let mut row = row.clone();
                row.complete(false, rng);
                row
            }
            None => {
                let name = pool.claim(names.get(index).map(String::as_str));
                let mut row = fallback(&name, index);
                row.set_name(name);
                row.complete(true, rng);
                row
            }
        };
        rows.push(row);
    }

    if count > base.len() {
        log::debug!("synthesized {} filler rows", count - base.len());
    }
    rows
}

/// Produce exactly `min(count, 100)` table rows by cycling the base rows, or
/// from `fallback(index)` when there are none
pub fn cycle_rows<T, F>(base: &[T], count: usize, fallback: F) -> Vec<T>
where
    T: Clone,
    F: Fn(usize) -> T,
{
    let count = count.min(MAX_TABLE_ROWS);
    if base.is_empty() {
        return (0..count).map(fallback).collect();
    }
    (0..count).map(|index| base[index % base.len()].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::row::FleetRow;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn complete_row(name: &str, efficiency: f64) -> FleetRow {
        let mut row = FleetRow {
            efficiency: Some(efficiency),
            ..FleetRow::named(name)
        };
        row.complete(false, &mut StdRng::seed_from_u64(0));
        row
    }

    fn fallback(name: &str, _index: usize) -> FleetRow {
        FleetRow::named(name)
    }

    fn cells(row: &FleetRow) -> [Option<f64>; 10] {
        [
            row.efficiency,
            row.motor_hours,
            row.elevator_hours,
            row.speed,
            row.idle_percent,
            row.maintenance_hours,
            row.availability,
            row.gps_percent,
            row.engine_on_hours,
            row.idle_hours,
        ]
    }

    fn assert_present_cells_kept(source: &FleetRow, row: &FleetRow) {
        assert_eq!(row.name, source.name);
        for (kept, given) in cells(row).iter().zip(cells(source).iter()) {
            assert!(kept.is_some());
            if given.is_some() {
                assert_eq!(kept, given);
            }
        }
    }

    #[test]
    fn test_truncates_to_target() {
        let base = vec![complete_row("7032", 60.0), complete_row("7036", 70.0)];
        let rows = normalize(&base, 1, &[], fallback, &mut StdRng::seed_from_u64(1));
        assert_eq!(rows, vec![base[0].clone()]);
    }

    #[test]
    fn test_raw_rows_keep_their_values() {
        let base: Vec<FleetRow> = serde_json::from_str(
            r#"[
                { "nome": "7032", "eficiencia": 64.5, "horasMotor": 18 },
                { "nome": "7036", "porcentagem": "91,2", "tempoLigado": 10, "percentual": 5 },
                { "nome": 7037, "disponibilidade": 88, "eficiencia": null }
            ]"#,
        )
        .unwrap();
        let rows = normalize(&base, 6, &[], fallback, &mut StdRng::seed_from_u64(3));

        assert_eq!(rows.len(), 6);
        for (row, source) in rows.iter().zip(base.iter()) {
            assert_present_cells_kept(source, row);
        }

        // missing cells of real rows are zero or derived, never random
        assert_eq!(rows[0].speed, Some(0.0));
        assert_eq!(rows[0].engine_on_hours, Some(18.0));
        assert_eq!(rows[1].idle_hours, Some(0.5));
        assert_eq!(rows[2].efficiency, Some(0.0));
    }

    #[test]
    fn test_zero_rows() {
        let base = vec![complete_row("7032", 60.0)];
        let rows = normalize(&base, 0, &[], fallback, &mut StdRng::seed_from_u64(1));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_extends_with_unique_names() {
        let base = vec![complete_row("7050", 60.0)];
        let names = vec!["7050".to_string(), "7050".to_string(), "Frota X".to_string()];
        let rows = normalize(&base, 4, &names, fallback, &mut StdRng::seed_from_u64(1));

        let got: Vec<&str> = rows.iter().map(|r| r.name()).collect();
        assert_eq!(got, vec!["7050", "7051", "Frota X", "7052"]);
        assert!(rows[1].motor_hours() >= 5.0);
    }

    #[test]
    fn test_clamps_to_max_rows() {
        let rows = normalize::<FleetRow, _, _>(&[], 80, &[], fallback, &mut StdRng::seed_from_u64(1));
        assert_eq!(rows.len(), MAX_SERIES_ROWS);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = normalize::<FleetRow, _, _>(&[], 5, &[], fallback, &mut StdRng::seed_from_u64(9));
        let b = normalize::<FleetRow, _, _>(&[], 5, &[], fallback, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fleet_names() {
        let names = fleet_names(&["7032", "", "7036"], 5);
        assert_eq!(names, vec!["7032", "7050", "7036", "7051", "7052"]);
        assert!(fleet_names::<&str>(&[], 0).is_empty());
    }

    #[test]
    fn test_cycle_rows() {
        let rows = cycle_rows(&[1, 2, 3], 7, |i| 100 + i);
        assert_eq!(rows, vec![1, 2, 3, 1, 2, 3, 1]);

        let filler = cycle_rows(&[] as &[usize], 3, |i| 8000 + i);
        assert_eq!(filler, vec![8000, 8001, 8002]);

        assert_eq!(cycle_rows(&[1], 500, |i| i).len(), MAX_TABLE_ROWS);
        assert!(cycle_rows(&[1], 0, |i| i).is_empty());
    }

    proptest! {
        #[test]
        fn prop_exact_length_and_base_prefix(
            base_len in 0usize..20,
            target in 0usize..=50,
            seed in any::<u64>(),
        ) {
            let base: Vec<FleetRow> = (0..base_len)
                .map(|i| complete_row(&format!("70{:02}", i), i as f64))
                .collect();
            let mut rng = StdRng::seed_from_u64(seed);
            let rows = normalize(&base, target, &[], fallback, &mut rng);

            prop_assert_eq!(rows.len(), target);
            for (row, source_row) in rows.iter().zip(base.iter()) {
                prop_assert_eq!(row, source_row);
            }

            let unique: FxHashSet<&str> = rows.iter().map(|r| r.name()).collect();
            prop_assert_eq!(unique.len(), rows.len());
        }

        #[test]
        fn prop_raw_base_cells_survive(
            efficiency in proptest::option::of(0.0..100.0f64),
            motor in proptest::option::of(0.0..24.0f64),
            gps in proptest::option::of(0.0..100.0f64),
            idle in proptest::option::of(0.0..20.0f64),
            target in 1usize..=50,
            seed in any::<u64>(),
        ) {
            let source = FleetRow {
                efficiency,
                motor_hours: motor,
                gps_percent: gps,
                idle_percent: idle,
                ..FleetRow::named("7032")
            };
            let base = vec![source.clone()];
            let rows = normalize(&base, target, &[], fallback, &mut StdRng::seed_from_u64(seed));

            prop_assert_eq!(rows.len(), target);
            for (kept, given) in cells(&rows[0]).iter().zip(cells(&source).iter()) {
                prop_assert!(kept.is_some());
                if given.is_some() {
                    prop_assert_eq!(kept, given);
                }
            }
        }
    }
}
