#[cfg(test)]
mod tests {
    use crate::Kinetics::kinetics_error::KinError;
    use crate::Kinetics::pseudo_first_order::{TargetFraction, time_to_fraction};
    use crate::Sweep::axis::{Axis, Column};
    use crate::Sweep::csv_output::write_csv;
    use crate::Sweep::plot::{
        Annotation, FigureSpec, Scale, clip_to_limits, collect_curves, render_figure,
    };
    use crate::Sweep::sweep_pipeline::SweepPipeline;
    use crate::Sweep::table::Table;
    use approx::assert_relative_eq;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::tempdir;

    fn fold_axis() -> Axis {
        Axis::from_values(Column::dimensionless("fold"), vec![1.0, 3.0, 10.0]).unwrap()
    }

    fn conc_axis(n: usize) -> Axis {
        Axis::logspace(Column::new("[H2O2]", "µM"), 1e-3, 1.0, n).unwrap()
    }

    fn t5_table(n: usize) -> Table {
        let f = TargetFraction::new(0.05).unwrap();
        SweepPipeline::new(vec![
            Column::new("t5", "s"),
            Column::new("t5_min", "min"),
        ])
        .with_axis(fold_axis())
        .with_axis(conc_axis(n))
        .run(|p| {
            let t = time_to_fraction(f, 10.0 * p[0], p[1] * 1e-6)?;
            Ok(vec![t, t / 60.0])
        })
        .unwrap()
    }

    #[test]
    fn test_cross_product_rows_are_unique() {
        let table = t5_table(7);
        assert_eq!(table.len(), 3 * 7);
        let keys: HashSet<(u64, u64)> = table
            .samples()
            .iter()
            .map(|s| (s.axis_values[0].to_bits(), s.axis_values[1].to_bits()))
            .collect();
        assert_eq!(keys.len(), 21);
    }

    #[test]
    fn test_last_axis_varies_fastest() {
        let table = t5_table(4);
        let folds = table.column_values("fold").unwrap();
        assert_eq!(&folds[..5], &[1.0, 1.0, 1.0, 1.0, 3.0]);
        let conc = table.column_values("[H2O2]").unwrap();
        assert_eq!(conc[0], 1e-3);
        assert_eq!(conc[3], 1.0);
        assert_eq!(conc[4], 1e-3);
    }

    #[test]
    fn test_derived_values() {
        let table = t5_table(4);
        let row = &table.samples()[3];
        // fold 1, 1 µM
        assert_relative_eq!(row.derived[0], 5129.329438755058, max_relative = 1e-12);
        assert_relative_eq!(row.derived[1], 85.48882397925097, max_relative = 1e-12);
        assert_eq!(
            table.headers(),
            vec!["fold", "[H2O2] [µM]", "t5 [s]", "t5_min [min]"]
        );
    }

    #[test]
    fn test_groups_follow_declaration_order() {
        let table = SweepPipeline::new(vec![Column::dimensionless("y")])
            .with_axis(Axis::from_values(Column::new("x", "V/m"), vec![1.0, 2.0]).unwrap())
            .with_axis(Axis::from_values(Column::new("F_eps", ""), vec![1.0, 2.0, 5.0]).unwrap())
            .run(|p| Ok(vec![p[0] * p[1]]))
            .unwrap();
        let groups = table.group_by(&["F_eps"]).unwrap();
        assert_eq!(groups.len(), 3);
        let keys: Vec<f64> = groups.iter().map(|g| g.key[0].1).collect();
        assert_eq!(keys, vec![1.0, 2.0, 5.0]);
        for g in &groups {
            assert_eq!(g.samples.len(), 2);
        }
        assert_eq!(groups[2].label(), "F_eps = 5");

        let by_two = table.group_by(&["F_eps", "x"]).unwrap();
        assert_eq!(by_two.len(), 6);
        assert_eq!(by_two[1].label(), "F_eps = 1, x = 2 V/m");
    }

    #[test]
    fn test_filter_extracts_slice() {
        let table = t5_table(5);
        let slice = table.filter(&[("fold", 3.0)]).unwrap();
        assert_eq!(slice.len(), 5);
        assert!(slice.samples().iter().all(|s| s.axis_values[0] == 3.0));
        assert_eq!(slice.axes()[0].values(), &[3.0]);
        // the filtered table still groups and renders like a full one
        assert_eq!(slice.group_by(&["fold"]).unwrap().len(), 1);

        assert!(matches!(
            table.filter(&[("fold", 4.0)]),
            Err(KinError::InvalidAxis { .. })
        ));
        assert!(matches!(
            table.filter(&[("k2", 10.0)]),
            Err(KinError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_error_names_combination() {
        let f = TargetFraction::new(0.05).unwrap();
        let result = SweepPipeline::new(vec![Column::new("t5", "s")])
            .with_axis(Axis::from_values(Column::new("k2", "1/(M s)"), vec![-1.0, 10.0]).unwrap())
            .with_axis(Axis::from_values(Column::new("C", "M"), vec![1e-6]).unwrap())
            .run(|p| Ok(vec![time_to_fraction(f, p[0], p[1])?]));
        match result {
            Err(KinError::Evaluation {
                combination,
                source,
            }) => {
                assert!(combination.contains("k2 [1/(M s)] = -1e0"));
                assert!(combination.contains("C [M] = 1e-6"));
                assert!(matches!(*source, KinError::NonPositive { name: "k2", .. }));
            }
            other => panic!("expected an evaluation error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_results_never_reach_table() {
        let result = SweepPipeline::new(vec![Column::dimensionless("inv")])
            .with_axis(Axis::from_values(Column::dimensionless("x"), vec![0.0, 1.0]).unwrap())
            .run(|p| Ok(vec![1.0 / p[0]]));
        let err = result.unwrap_err();
        assert!(matches!(err, KinError::Evaluation { .. }));
        assert!(err.to_string().contains("x = 0e0"));
    }

    #[test]
    fn test_shape_and_name_checks() {
        let wrong_len = SweepPipeline::new(vec![Column::dimensionless("a"), Column::dimensionless("b")])
            .with_axis(Axis::from_values(Column::dimensionless("x"), vec![1.0]).unwrap())
            .run(|_| Ok(vec![1.0]));
        assert!(matches!(
            wrong_len,
            Err(KinError::ShapeMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));

        let duplicate = SweepPipeline::new(vec![Column::dimensionless("x")])
            .with_axis(Axis::from_values(Column::dimensionless("x"), vec![1.0]).unwrap())
            .run(|p| Ok(vec![p[0]]));
        assert!(matches!(duplicate, Err(KinError::InvalidSettings(_))));

        let no_axes = SweepPipeline::new(vec![Column::dimensionless("y")]).run(|_| Ok(vec![0.0]));
        assert!(matches!(no_axes, Err(KinError::InvalidSettings(_))));
    }

    #[test]
    fn test_csv_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t5.csv");
        let table = t5_table(6);
        write_csv(&table, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(|h| h.to_string()).collect();
        assert_eq!(headers, table.headers());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), table.len());
        let first_t5: f64 = rows[0][2].parse().unwrap();
        assert_eq!(first_t5, table.samples()[0].derived[0]);
    }

    #[test]
    fn test_csv_is_reproducible() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        write_csv(&t5_table(30), &a).unwrap();
        write_csv(&t5_table(30), &b).unwrap();
        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }

    #[test]
    fn test_collect_curves() {
        let table = t5_table(5);
        let spec = FigureSpec::loglog("t5.png", "[H2O2]", "t5_min", &["fold"]);
        let curves = collect_curves(&table, &spec).unwrap();
        assert_eq!(curves.len(), 3);
        assert_eq!(curves[1].label, "fold = 3");
        assert_eq!(curves[1].points.len(), 5);
        // t5 falls as [H2O2] grows
        assert!(curves[0].points.windows(2).all(|w| w[1].1 < w[0].1));

        let missing = FigureSpec::loglog("x.png", "[H2O2]", "t2", &["fold"]);
        assert!(matches!(
            collect_curves(&table, &missing),
            Err(KinError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_lines_run_to_the_frame_at_fixed_limits() {
        let mut spec = FigureSpec::loglog("t.png", "x", "y", &[]);
        spec.x_scale = Scale::Linear;
        spec.y_scale = Scale::Linear;
        let points = [(1.0, 1.0), (2.0, 10.0), (3.0, 100.0), (4.0, 20.0)];

        // no limits: untouched
        assert_eq!(clip_to_limits(&points, &spec), vec![points.to_vec()]);

        // leaves through the top and comes back
        spec.y_limits = Some((0.0, 50.0));
        let pieces = clip_to_limits(&points, &spec);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0][..2], [(1.0, 1.0), (2.0, 10.0)]);
        let exit = pieces[0][2];
        assert_relative_eq!(exit.0, 2.0 + 40.0 / 90.0, max_relative = 1e-12);
        assert_relative_eq!(exit.1, 50.0, max_relative = 1e-12);
        let entry = pieces[1][0];
        assert_relative_eq!(entry.0, 3.0 + 50.0 / 80.0, max_relative = 1e-12);
        assert_relative_eq!(entry.1, 50.0, max_relative = 1e-12);
        assert_eq!(pieces[1][1], (4.0, 20.0));

        // cut points on a log axis are interpolated in log10
        spec.y_scale = Scale::Log;
        spec.y_limits = Some((1.0, 10.0));
        let pieces = clip_to_limits(&[(0.0, 1.0), (1.0, 100.0)], &spec);
        assert_eq!(pieces.len(), 1);
        assert_relative_eq!(pieces[0][1].0, 0.5, max_relative = 1e-12);
        assert_relative_eq!(pieces[0][1].1, 10.0, max_relative = 1e-12);

        // entirely outside
        assert!(clip_to_limits(&[(0.0, 200.0), (1.0, 300.0)], &spec).is_empty());
    }

    #[test]
    #[ignore = "needs system fonts"]
    fn test_render_png() {
        let dir = tempdir().unwrap();
        let table = t5_table(20);
        let mut spec = FigureSpec::loglog("t5.png", "[H2O2]", "t5_min", &["fold"])
            .with_title("t5 vs [H2O2]")
            .with_labels("[H2O2] (µM)", "Time to 5% oxidation (min)")
            .with_legend_title("Rate enhancement");
        spec.annotation = Some(Annotation {
            text: "slow".to_string(),
            xy: (1e-2, 1.5e4),
            text_xy: (8e-2, 4e4),
        });
        let path = render_figure(&table, &spec, dir.path(), (640, 480)).unwrap();
        assert!(path.exists());
        assert!(fs::metadata(&path).unwrap().len() > 0);

        spec.y_scale = Scale::Linear;
        spec.file_name = "t5_lin.png".to_string();
        assert!(render_figure(&table, &spec, dir.path(), (640, 480)).is_ok());
    }
}
