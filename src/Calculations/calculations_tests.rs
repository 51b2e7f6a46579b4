#[cfg(test)]
mod tests {
    use crate::Calculations::emf_rates_task::{self, EmfAcceleratedRatesTask};
    use crate::Calculations::field_sweep_task::{self, FieldSweepTask};
    use crate::Calculations::local_fields_task::{self, LocalFieldsTask};
    use crate::Calculations::pseudo_first_order_task::{self, bulk_time_table};
    use crate::Calculations::reverse_calculator::{self, ReverseCalculatorTask};
    use crate::Calculations::{Calculation, TaskKind, create_task, run_tasks};
    use crate::Kinetics::kinetics_error::KinError;
    use crate::settings::{GridRange, OutputSettings, Settings};
    use approx::assert_relative_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn quiet_output(dir: &Path) -> OutputSettings {
        let mut output = OutputSettings::in_dir(dir);
        output.render_figures = false;
        output.preview_rows = 0;
        output
    }

    fn csv_rows(path: &Path) -> usize {
        csv::Reader::from_path(path).unwrap().records().count()
    }

    #[test]
    fn test_task_names() {
        for kind in TaskKind::ALL {
            assert_eq!(TaskKind::from_name(kind.cli_name()), Some(kind));
            assert!(!kind.description().is_empty());
        }
        assert_eq!(TaskKind::from_name("FieldSweep"), Some(TaskKind::FieldSweep));
        assert_eq!(TaskKind::from_name("LOCAL-FIELDS"), Some(TaskKind::LocalFields));
        assert_eq!(TaskKind::from_name("fig2"), None);
        let settings = Settings::new();
        assert_eq!(create_task(TaskKind::ReverseCalculator, &settings).name(), "ReverseCalculator");
    }

    #[test]
    fn test_bulk_table_scenario() {
        let settings = Settings::new().pseudo_first_order;
        let table = bulk_time_table(&settings).unwrap();
        assert_eq!(table.len(), 300);
        let last = table.samples().last().unwrap();
        // 1 µM, k2 = 10
        assert_relative_eq!(last.derived[0], 1e-5, max_relative = 1e-12);
        assert_relative_eq!(last.derived[1], 5129.329438755058, max_relative = 1e-10);
        assert_relative_eq!(last.derived[2], 85.48882397925097, max_relative = 1e-10);
        assert_eq!(last.derived[3], 100000.0);
        assert_relative_eq!(last.derived[5], 1e-6 * 6.02214076e23 * 3e-12, max_relative = 1e-12);
        // monotone in concentration
        let t5 = table.column_values("t5_seconds").unwrap();
        assert!(t5.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_pseudo_first_order_task_writes_csv() {
        let dir = tempdir().unwrap();
        let output = quiet_output(dir.path());
        let report = create_task(TaskKind::PseudoFirstOrder, &Settings::new())
            .run(&output)
            .unwrap();
        let csv = dir.path().join(pseudo_first_order_task::CSV_FILE);
        assert_eq!(report.csv_files, vec![csv.clone()]);
        assert!(report.figures.is_empty());
        assert_eq!(csv_rows(&csv), 300);
        let header = fs::read_to_string(&csv).unwrap().lines().next().unwrap().to_string();
        assert_eq!(
            header,
            "H2O2 [µM],k_prime [1/s],t5_seconds [s],t5_minutes [min],copies,cell_volume [pL],H2O2_molecules"
        );
        assert!(report.summary[0].contains("independent of copy number"));
    }

    #[test]
    fn test_reverse_scenario() {
        let mut settings = Settings::new().reverse;
        settings.target_time_min = 5.0;
        let task = ReverseCalculatorTask::new(settings);
        let result = task.solve().unwrap();
        assert_relative_eq!(result.required_conc_m, 1.7097764795850194e-05, max_relative = 1e-10);
        // 1 µM given: k2 = -ln(0.95) / (300 s * 1e-6 M)
        assert_relative_eq!(result.required_k2, 170.97764795850194, max_relative = 1e-10);
        assert_relative_eq!(result.check_fraction_a, 0.05, max_relative = 1e-12);
        assert_relative_eq!(result.check_fraction_b, 0.05, max_relative = 1e-12);
        assert_relative_eq!(
            result.molecules_per_cell,
            1.7097764795850194e-05 * 6.02214076e23 * 3e-12,
            max_relative = 1e-10
        );

        let by_k2 = task.required_h2o2_table().unwrap();
        assert_eq!(by_k2.len(), 200);
        let req = by_k2.column_values("required_H2O2").unwrap();
        assert!(req.windows(2).all(|w| w[1] < w[0]));
        let by_conc = task.required_k2_table().unwrap();
        assert_eq!(by_conc.len(), 200);
    }

    #[test]
    fn test_reverse_task_outputs() {
        let dir = tempdir().unwrap();
        let report = ReverseCalculatorTask::new(Settings::new().reverse)
            .run(&quiet_output(dir.path()))
            .unwrap();
        assert_eq!(report.csv_files.len(), 2);
        for name in [reverse_calculator::H2O2_SWEEP_FILE, reverse_calculator::K2_SWEEP_FILE] {
            assert_eq!(csv_rows(&dir.path().join(format!("{}.csv", name))), 200);
        }
        assert!(report.summary[0].contains("required [H2O2] = 17.098 µM"));
        assert!(report.summary[2].contains("required k2 = 171.0 M^-1 s^-1"));
    }

    #[test]
    fn test_emf_rates_tables() {
        let task = EmfAcceleratedRatesTask::new(Settings::new().emf_rates);
        let sweep = task.sweep_table().unwrap();
        assert_eq!(sweep.len(), 7 * 300);
        assert_eq!(sweep.group_by(&["fold_enhancement"]).unwrap().len(), 7);

        let summary = task.summary_table().unwrap();
        assert_eq!(summary.len(), 7);
        assert_eq!(
            summary.headers(),
            vec![
                "fold_enhancement",
                "t5_at_0.01_uM [min]",
                "t5_at_0.1_uM [min]",
                "t5_at_1_uM [min]"
            ]
        );
        // fold 1 at 1 µM is the bulk scenario, fold 1000 is a thousand times faster
        let first = &summary.samples()[0];
        assert_relative_eq!(first.derived[2], 85.48882397925097, max_relative = 1e-10);
        assert_relative_eq!(first.derived[0], 8548.882397925097, max_relative = 1e-10);
        let last = summary.samples().last().unwrap();
        assert_relative_eq!(last.derived[2] * 1000.0, first.derived[2], max_relative = 1e-10);
    }

    #[test]
    fn test_emf_rates_task_files() {
        let dir = tempdir().unwrap();
        let report = EmfAcceleratedRatesTask::new(Settings::new().emf_rates)
            .run(&quiet_output(dir.path()))
            .unwrap();
        assert_eq!(csv_rows(&dir.path().join(emf_rates_task::SWEEP_CSV)), 2100);
        assert_eq!(csv_rows(&dir.path().join(emf_rates_task::SUMMARY_CSV)), 7);
        assert_eq!(report.summary.len(), 7);
        assert!(report.summary[0].starts_with("1x:"));
    }

    #[test]
    fn test_field_cases_regression() {
        let task = FieldSweepTask::new(Settings::new().field_sweep);
        let cases = task.cases().unwrap();
        let expected = [
            1.151886940420471,
            1.2325564513202891,
            1.6787318875677022,
            4.0120721776878865,
        ];
        assert_eq!(cases.len(), expected.len());
        for (case, fold) in cases.iter().zip(expected) {
            assert_relative_eq!(case.fold, fold, max_relative = 1e-9);
            assert_relative_eq!(case.k_eff, 10.0 * fold, max_relative = 1e-9);
        }
        assert_relative_eq!(cases[0].k_eff, 11.518869404204711, max_relative = 1e-9);
        assert!(cases[0].describe().starts_with("E=1.00e8 V/m, Δμ=15 D"));
    }

    #[test]
    fn test_field_sweep_table_and_slices() {
        let mut settings = Settings::new().field_sweep;
        settings.field_V_per_m = GridRange::new(1e7, 3e8, 20);
        let task = FieldSweepTask::new(settings);
        let table = task.sweep_table().unwrap();
        assert_eq!(table.len(), 20 * 3 * 3 * 3 * 4);
        assert_eq!(
            table.headers(),
            vec![
                "E [V/m]",
                "delta_mu [D]",
                "theta_c [deg]",
                "mu_eff [D]",
                "F_eps",
                "fold_accel",
                "k_eff [1/(M s)]"
            ]
        );

        let (slice_a, spec_a) = task.figure_a(&table).unwrap();
        assert_eq!(slice_a.len(), 20 * 3);
        let groups = slice_a.group_by(&["delta_mu"]).unwrap();
        let labels: Vec<String> = groups.iter().map(|g| g.label()).collect();
        assert_eq!(labels, vec!["delta_mu = 10 D", "delta_mu = 15 D", "delta_mu = 20 D"]);
        assert_eq!(spec_a.file_name, field_sweep_task::FIGURE_A_FILE);

        let (slice_b, _) = task.figure_b(&table).unwrap();
        assert_eq!(slice_b.len(), 20 * 4);
        // focusing only moves the curve along E: fold(F_eps, E) == fold(1, F_eps * E)
        let fold = slice_b.column_values("fold_accel").unwrap();
        assert!(fold.iter().all(|v| *v >= 1.0));
        let groups = slice_b.group_by(&["F_eps"]).unwrap();
        assert_eq!(groups.len(), 4);
        for g in &groups {
            let mut previous = 0.0;
            for s in &g.samples {
                assert!(s.derived[0] > previous);
                previous = s.derived[0];
            }
        }
    }

    #[test]
    fn test_local_fields_table() {
        let task = LocalFieldsTask::new(Settings::new().local_fields);
        assert_relative_eq!(task.focusing().unwrap(), 8.0);
        let table = task.field_table().unwrap();
        assert_eq!(table.len(), 41);
        let lambda = table.column_values("lambda_D").unwrap();
        assert_relative_eq!(lambda[0], 0.8085285769873656, max_relative = 1e-9);

        let e_mem = table.column_values("E_mem").unwrap();
        let focused = table.column_values("E_mem_focused").unwrap();
        assert!(e_mem.iter().all(|e| *e < 0.0));
        // |E_mem| decays with distance
        assert!(e_mem.windows(2).all(|w| w[1].abs() < w[0].abs()));
        for (raw, f) in e_mem.iter().zip(&focused) {
            assert_relative_eq!(*f, 8.0 * raw, max_relative = 1e-12);
        }
        let residue = table.column_values("E_res_normal").unwrap();
        assert!(residue.iter().all(|r| *r == residue[0]));

        let total = table.column_values("E_total_normal").unwrap();
        let fold = table.column_values("fold_accel").unwrap();
        let k_eff = table.column_values("k_eff").unwrap();
        for i in 0..table.len() {
            assert!(fold[i] >= 1.0);
            assert_relative_eq!(k_eff[i], 10.0 * fold[i], max_relative = 1e-12);
            assert!(total[i].is_finite());
        }
    }

    #[test]
    fn test_local_fields_without_rates() {
        let mut settings = Settings::new().local_fields;
        settings.site_rates = None;
        settings.F_eps = Some(2.0);
        let task = LocalFieldsTask::new(settings);
        let table = task.field_table().unwrap();
        assert_eq!(table.derived_columns().len(), 6);
        assert!(matches!(
            table.column_index("fold_accel"),
            Err(KinError::UnknownColumn(_))
        ));
        let dir = tempdir().unwrap();
        task.run(&quiet_output(dir.path())).unwrap();
        assert_eq!(csv_rows(&dir.path().join(local_fields_task::CSV_FILE)), 41);
    }

    #[test]
    fn test_invalid_settings_write_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let mut settings = Settings::new();
        settings.output = quiet_output(&out);
        settings.field_sweep.F_eps = vec![0.5, 1.0];
        let result = run_tasks(&TaskKind::ALL, &settings);
        assert!(matches!(result, Err(KinError::InvalidSettings(_))));
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_output_dir_is_fatal() {
        let dir = tempdir().unwrap();
        let mut output = quiet_output(&dir.path().join("absent"));
        output.create_dir = false;
        let result = create_task(TaskKind::ReverseCalculator, &Settings::new()).run(&output);
        assert!(matches!(result, Err(KinError::MissingOutputDir(_))));
    }

    #[test]
    fn test_reruns_are_byte_identical() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let mut settings = Settings::new();
        settings.field_sweep.field_V_per_m = GridRange::new(1e7, 3e8, 10);
        let kinds = [TaskKind::EmfAcceleratedRates, TaskKind::FieldSweep, TaskKind::LocalFields];
        for dir in [first.path(), second.path()] {
            settings.output = quiet_output(dir);
            run_tasks(&kinds, &settings).unwrap();
        }
        for name in [
            emf_rates_task::SWEEP_CSV,
            emf_rates_task::SUMMARY_CSV,
            field_sweep_task::CSV_FILE,
            local_fields_task::CSV_FILE,
        ] {
            assert_eq!(
                fs::read(first.path().join(name)).unwrap(),
                fs::read(second.path().join(name)).unwrap()
            );
        }
    }

    #[test]
    #[ignore = "needs system fonts"]
    fn test_all_tasks_with_figures() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::new();
        settings.output = OutputSettings::in_dir(dir.path());
        settings.output.preview_rows = 0;
        let reports = run_tasks(&TaskKind::ALL, &settings).unwrap();
        let figures: usize = reports.iter().map(|r| r.figures.len()).sum();
        // 1 + 1 + 2 + 1 + 2 + 1
        assert_eq!(figures, 8);
        for report in &reports {
            for path in &report.figures {
                assert!(fs::metadata(path).unwrap().len() > 0);
            }
        }
    }
}
