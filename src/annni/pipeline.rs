//! # 标定流水线
//!
//! 加载 -> 选取 -> 连接 -> 推导 -> 拟合 -> 误差。每一步都是可单独测试的纯函数，
//! 只有 `prepare` 读文件。写出结果由 `annni/export.rs` 完成。
//!
//! `prepare` 先收集拟合前就能确定的问题（目标缺失、连接缺口、空参考值），
//! 即使随后 `calibrate` 失败，调用方也能先把它们报告出来。
//!
//! ## 依赖关系
//! - 被 `commands/calibrate.rs` 调用
//! - 使用 `parsers/sfe_table.rs`, `parsers/lattice_table.rs`
//! - 使用 `annni/model.rs`, `annni/fit.rs`

use super::config::{CalibrationConfig, COMPOSITION_TOLERANCE};
use super::fit::{fit_scale_factor, percent_error};
use super::model::fault_energies;
use crate::error::{Result, SfeError};
use crate::models::{
    AlloyRecord, CalibrationReport, CalibrationRow, Composition, FaultEstimate, FaultType,
    JoinedRecord, LatticeRecord, PerFault, RecordKey, RowIssue,
};
use crate::parsers::{lattice_table, sfe_table};

use std::collections::HashMap;

/// 拟合前的中间结果
#[derive(Debug)]
pub struct Prepared {
    pub joined: Vec<JoinedRecord>,
    /// 加载、选取、连接阶段的问题
    pub issues: Vec<RowIssue>,
}

/// 加载两张表，选取目标行并连接晶格常数
pub fn prepare(config: &CalibrationConfig) -> Result<Prepared> {
    config.validate()?;

    let alloys = sfe_table::load_sfe_table(&config.sfe_path)?;
    let lattices = lattice_table::load_lattice_table(&config.lattice_path)?;

    let mut issues = composition_issues(&config.targets);
    issues.extend(missing_target_issues(&alloys, &config.targets));

    let selected = select_targets(&alloys, &config.targets, config.temperatures_per_target);
    let joined = join_lattice(selected, &lattices, config.lattice_divisor)?;
    issues.extend(row_issues(&joined));

    Ok(Prepared { joined, issues })
}

/// 每个目标成分取最低的若干个温度，按目标顺序、温度升序排列
pub fn select_targets(
    records: &[AlloyRecord],
    targets: &[String],
    per_target: usize,
) -> Vec<AlloyRecord> {
    targets
        .iter()
        .flat_map(|target| {
            let mut rows: Vec<&AlloyRecord> = records
                .iter()
                .filter(|r| &r.composition == target)
                .collect();
            rows.sort_by_key(|r| r.temperature);
            rows.dedup_by_key(|r| r.temperature);
            rows.into_iter().take(per_target).cloned()
        })
        .collect()
}

/// 按 (成分, 温度) 左连接晶格常数，并换算为 Å
///
/// 没有匹配的行得到 `lattice_angstrom = None`；匹配到非正值是致命错误。
pub fn join_lattice(
    records: Vec<AlloyRecord>,
    lattices: &[LatticeRecord],
    divisor: f64,
) -> Result<Vec<JoinedRecord>> {
    let index: HashMap<RecordKey, f64> = lattices
        .iter()
        .map(|l| (l.key(), l.a_fcc_raw))
        .collect();

    records
        .into_iter()
        .map(|alloy| {
            let lattice_angstrom = match index.get(&alloy.key()) {
                Some(&raw) if raw.is_finite() && raw > 0.0 => Some(raw / divisor),
                Some(&raw) => {
                    return Err(SfeError::InvalidLattice {
                        composition: alloy.composition.clone(),
                        temperature: alloy.temperature,
                        value: raw,
                    })
                }
                None => None,
            };
            Ok(JoinedRecord {
                alloy,
                lattice_angstrom,
            })
        })
        .collect()
}

/// 已选取行上的连接缺口和空参考值
pub fn row_issues(joined: &[JoinedRecord]) -> Vec<RowIssue> {
    let mut issues = Vec::new();
    for j in joined {
        let a = &j.alloy;
        if j.lattice_angstrom.is_none() {
            issues.push(RowIssue::JoinGap {
                composition: a.composition.clone(),
                temperature: a.temperature,
            });
        }
        for fault in FaultType::ALL {
            if a.empirical.get(fault).is_none() {
                issues.push(RowIssue::MissingEmpirical {
                    composition: a.composition.clone(),
                    temperature: a.temperature,
                    fault,
                });
            }
        }
    }
    issues
}

/// 推导 ANNNI 值，拟合标定因子并计算误差
///
/// 报告中的 `issues` 只含拟合之后才出现的问题（参考值为零）。
pub fn calibrate(joined: &[JoinedRecord]) -> Result<CalibrationReport> {
    let mut issues = Vec::new();

    // ANNNI 解析值；连接缺口处无定义
    let analytical: Vec<PerFault<Option<f64>>> = joined
        .iter()
        .map(|j| {
            let a = &j.alloy;
            match j.lattice_angstrom {
                Some(lattice) => {
                    fault_energies(a.e_fcc, a.e_hcp, a.e_dhcp, lattice).map(|_, g| Some(*g))
                }
                None => PerFault::default(),
            }
        })
        .collect();

    let scale_factors = PerFault::try_from_fn(|fault| {
        let pairs = joined.iter().zip(&analytical).filter_map(|(j, x)| {
            match (*x.get(fault), *j.alloy.empirical.get(fault)) {
                (Some(x), Some(y)) => Some((x, y)),
                _ => None,
            }
        });
        fit_scale_factor(pairs).ok_or(SfeError::DegenerateFit { fault })
    })?;

    let rows: Vec<CalibrationRow> = joined
        .iter()
        .zip(&analytical)
        .map(|(j, x)| {
            let a = &j.alloy;
            let faults = x.map(|fault, analytical| {
                let empirical_raw = *a.empirical.get(fault);
                let empirical_scaled = empirical_raw.map(|y| scale_factors.get(fault) * y);

                let error = match (analytical, empirical_scaled) {
                    (Some(x), Some(scaled)) => {
                        let err = percent_error(*x, scaled);
                        if err.is_none() {
                            issues.push(RowIssue::DivisionByZero {
                                composition: a.composition.clone(),
                                temperature: a.temperature,
                                fault,
                            });
                        }
                        err
                    }
                    _ => None,
                };

                FaultEstimate {
                    analytical: *analytical,
                    empirical_raw,
                    empirical_scaled,
                    percent_error: error,
                }
            });

            CalibrationRow {
                composition: a.composition.clone(),
                temperature: a.temperature,
                lattice_angstrom: j.lattice_angstrom,
                faults,
            }
        })
        .collect();

    let max_abs_error = PerFault::from_fn(|fault| {
        rows.iter()
            .filter_map(|r| r.faults.get(fault).percent_error)
            .map(f64::abs)
            .fold(None, |acc: Option<f64>, e| Some(acc.map_or(e, |m| m.max(e))))
    });

    Ok(CalibrationReport {
        rows,
        scale_factors,
        max_abs_error,
        issues,
    })
}

/// 目标成分标识无法解析或分数之和偏离 1 时给出警告
fn composition_issues(targets: &[String]) -> Vec<RowIssue> {
    targets
        .iter()
        .filter_map(|t| match Composition::parse(t) {
            Some(c) if c.is_normalized(COMPOSITION_TOLERANCE) => None,
            Some(c) => Some(RowIssue::CompositionSum {
                composition: t.clone(),
                sum: Some(c.fraction_sum()),
            }),
            None => Some(RowIssue::CompositionSum {
                composition: t.clone(),
                sum: None,
            }),
        })
        .collect()
}

fn missing_target_issues(records: &[AlloyRecord], targets: &[String]) -> Vec<RowIssue> {
    targets
        .iter()
        .filter(|t| !records.iter().any(|r| &r.composition == *t))
        .map(|t| RowIssue::TargetNotFound {
            composition: t.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const FE: &str = "Cr0.00_Co0.00_Fe1.00";
    const HEA: &str = "Cr0.33_Co0.33_Fe0.33";

    fn alloy(comp: &str, t: i64, energies: (f64, f64, f64), gamma: [Option<f64>; 3]) -> AlloyRecord {
        AlloyRecord {
            composition: comp.to_string(),
            temperature: t,
            e_fcc: energies.0,
            e_hcp: energies.1,
            e_dhcp: energies.2,
            empirical: PerFault::new(gamma[0], gamma[1], gamma[2]),
        }
    }

    fn joined(comp: &str, t: i64, energies: (f64, f64, f64), gamma: [Option<f64>; 3]) -> JoinedRecord {
        JoinedRecord {
            alloy: alloy(comp, t, energies, gamma),
            lattice_angstrom: Some(3.54),
        }
    }

    fn lattice(comp: &str, t: i64, raw: f64) -> LatticeRecord {
        LatticeRecord {
            composition: comp.to_string(),
            temperature: t,
            a_fcc_raw: raw,
        }
    }

    const E_FE: (f64, f64, f64) = (-4.10, -4.05, -4.08);

    #[test]
    fn test_select_three_lowest_temperatures() {
        let records: Vec<AlloyRecord> = [500, 100, 400, 300, 200]
            .iter()
            .map(|&t| alloy(FE, t, E_FE, [Some(1.0); 3]))
            .chain(std::iter::once(alloy(HEA, 50, E_FE, [Some(1.0); 3])))
            .collect();

        let selected = select_targets(&records, &[FE.to_string()], 3);
        let temps: Vec<i64> = selected.iter().map(|r| r.temperature).collect();
        assert_eq!(temps, vec![100, 200, 300]);
    }

    #[test]
    fn test_select_fewer_than_three_and_target_order() {
        let records = vec![
            alloy(FE, 300, E_FE, [Some(1.0); 3]),
            alloy(HEA, 500, E_FE, [Some(1.0); 3]),
            alloy(HEA, 150, E_FE, [Some(1.0); 3]),
        ];
        let targets = vec![HEA.to_string(), FE.to_string(), "Cr0.50_Co0.25_Fe0.25".to_string()];

        let selected = select_targets(&records, &targets, 3);
        let keys: Vec<(String, i64)> = selected.iter().map(|r| r.key()).collect();
        assert_eq!(
            keys,
            vec![
                (HEA.to_string(), 150),
                (HEA.to_string(), 500),
                (FE.to_string(), 300)
            ]
        );
    }

    #[test]
    fn test_join_converts_and_marks_gaps() {
        let records = vec![
            alloy(FE, 300, E_FE, [Some(1.0); 3]),
            alloy(FE, 500, E_FE, [Some(1.0); 3]),
        ];
        let lattices = vec![lattice(FE, 300, 35.4)];

        let joined = join_lattice(records, &lattices, 10.0).unwrap();
        assert!((joined[0].lattice_angstrom.unwrap() - 3.54).abs() < 1e-12);
        assert_eq!(joined[1].lattice_angstrom, None);
    }

    #[test]
    fn test_join_rejects_non_positive_lattice() {
        let records = vec![alloy(FE, 300, E_FE, [Some(1.0); 3])];
        let err = join_lattice(records, &[lattice(FE, 300, 0.0)], 10.0).unwrap_err();
        assert!(matches!(
            err,
            SfeError::InvalidLattice { temperature: 300, .. }
        ));
    }

    #[test]
    fn test_single_row_calibration_is_exact() {
        let rows = vec![joined(FE, 300, E_FE, [Some(30.0), Some(20.0), Some(10.0)])];
        let report = calibrate(&rows).unwrap();

        let isf = report.rows[0].faults.isf;
        let analytical = isf.analytical.unwrap();
        assert!((analytical - 265.733).abs() < 1e-3);
        assert!((report.scale_factors.isf - analytical / 30.0).abs() < 1e-9);
        assert!((isf.empirical_scaled.unwrap() - analytical).abs() < 1e-9);
        assert!(isf.percent_error.unwrap().abs() < 1e-9);
        assert!(report.max_abs_error.isf.unwrap() < 1e-9);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_reference_equal_to_analytical_gives_unit_scale() {
        let energies = [
            (-4.10, -4.05, -4.08),
            (-4.20, -4.18, -4.19),
            (-4.00, -3.90, -3.97),
        ];
        // 先求解析值，再把它们当作 ISF 参考值
        let analytical: Vec<f64> = energies
            .iter()
            .map(|e| fault_energies(e.0, e.1, e.2, 3.54).isf)
            .collect();
        let rows: Vec<JoinedRecord> = energies
            .iter()
            .zip(&analytical)
            .enumerate()
            .map(|(i, (e, x))| joined(FE, 100 * i as i64, *e, [Some(*x), Some(5.0), Some(5.0)]))
            .collect();

        let report = calibrate(&rows).unwrap();
        assert!((report.scale_factors.isf - 1.0).abs() < 1e-12);
        for row in &report.rows {
            assert!(row.faults.isf.percent_error.unwrap().abs() < 1e-9);
        }
    }

    #[test]
    fn test_degenerate_fit_is_fatal() {
        let rows = vec![
            joined(FE, 100, E_FE, [Some(10.0), Some(0.0), Some(5.0)]),
            joined(FE, 200, E_FE, [Some(12.0), Some(-3.0), Some(6.0)]),
        ];
        let err = calibrate(&rows).unwrap_err();
        assert!(matches!(
            err,
            SfeError::DegenerateFit {
                fault: FaultType::Esf
            }
        ));
    }

    #[test]
    fn test_join_gap_is_excluded_and_reported() {
        let mut gap = joined(HEA, 300, (-4.0, -3.9, -3.95), [Some(1000.0); 3]);
        gap.lattice_angstrom = None;
        let rows = vec![joined(FE, 300, E_FE, [Some(30.0), Some(20.0), Some(10.0)]), gap];

        let with_gap = calibrate(&rows).unwrap();
        let without_gap = calibrate(&rows[..1]).unwrap();
        assert_eq!(with_gap.scale_factors, without_gap.scale_factors);

        let gap_row = &with_gap.rows[1];
        assert_eq!(gap_row.lattice_angstrom, None);
        assert_eq!(gap_row.faults.isf.analytical, None);
        assert_eq!(gap_row.faults.isf.percent_error, None);
        assert!(gap_row.faults.isf.empirical_scaled.is_some());
        assert!(with_gap.issues.is_empty());
        assert_eq!(
            row_issues(&rows),
            vec![RowIssue::JoinGap {
                composition: HEA.to_string(),
                temperature: 300
            }]
        );
    }

    #[test]
    fn test_zero_reference_gives_undefined_error() {
        let rows = vec![
            joined(FE, 100, E_FE, [Some(30.0), Some(20.0), Some(10.0)]),
            joined(FE, 200, E_FE, [Some(0.0), Some(20.0), Some(10.0)]),
        ];
        let report = calibrate(&rows).unwrap();

        let zero = report.rows[1].faults.isf;
        assert_eq!(zero.empirical_scaled, Some(0.0));
        assert_eq!(zero.percent_error, None);
        assert!(report.max_abs_error.isf.is_some());
        assert!(report.issues.contains(&RowIssue::DivisionByZero {
            composition: FE.to_string(),
            temperature: 200,
            fault: FaultType::Isf,
        }));
    }

    #[test]
    fn test_missing_reference_is_reported() {
        let rows = vec![
            joined(FE, 100, E_FE, [Some(30.0), Some(20.0), Some(10.0)]),
            joined(FE, 200, E_FE, [Some(31.0), None, Some(10.0)]),
        ];
        let report = calibrate(&rows).unwrap();

        let esf = report.rows[1].faults.esf;
        assert!(esf.analytical.is_some());
        assert_eq!(esf.empirical_scaled, None);
        assert_eq!(esf.percent_error, None);
        assert!(report.issues.is_empty());
        assert_eq!(
            row_issues(&rows),
            vec![RowIssue::MissingEmpirical {
                composition: FE.to_string(),
                temperature: 200,
                fault: FaultType::Esf,
            }]
        );
    }

    fn write_tables(dir: &std::path::Path, sfe_rows: &str, lattice_rows: &str) -> CalibrationConfig {
        let sfe = dir.join("SFE_all.csv");
        let lattice = dir.join("Lattice_all.csv");
        fs::write(
            &sfe,
            format!(
                "composition,T(K),E_fcc(eV/atom),E_hcp(eV/atom),E_dhcp(eV/atom),γ_ISF(mJ/m²),γ_ESF(mJ/m²),γ_Twin(mJ/m²)\n{}",
                sfe_rows
            ),
        )
        .unwrap();
        fs::write(&lattice, format!("composition,T(K),a_fcc(Å)\n{}", lattice_rows)).unwrap();
        CalibrationConfig {
            sfe_path: sfe,
            lattice_path: lattice,
            output_path: dir.join("out.csv"),
            targets: vec![FE.to_string(), HEA.to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_join_gaps_survive_failed_fit() {
        let dir = tempfile::tempdir().unwrap();
        // 晶格表中的成分写法与能量表不一致，所有行都连接失败
        let config = write_tables(
            dir.path(),
            "Cr0.00_Co0.00_Fe1.00,100,-4.10,-4.05,-4.08,30,20,10\n",
            "Fe,100,35.3\n",
        );

        let prepared = prepare(&config).unwrap();
        assert!(prepared.issues.contains(&RowIssue::JoinGap {
            composition: FE.to_string(),
            temperature: 100,
        }));
        assert!(prepared.issues.contains(&RowIssue::TargetNotFound {
            composition: HEA.to_string(),
        }));

        assert!(matches!(
            calibrate(&prepared.joined).unwrap_err(),
            SfeError::DegenerateFit {
                fault: FaultType::Isf
            }
        ));
    }

    #[test]
    fn test_prepare_selects_and_joins() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_tables(
            dir.path(),
            "Cr0.00_Co0.00_Fe1.00,300,-4.10,-4.05,-4.08,30,20,10\nCr0.33_Co0.33_Fe0.33,300,-4.20,-4.18,-4.19,25,,12\n",
            "Cr0.00_Co0.00_Fe1.00,300,35.4\nCr0.33_Co0.33_Fe0.33,300,35.6\n",
        );

        let prepared = prepare(&config).unwrap();
        assert_eq!(prepared.joined.len(), 2);
        assert!(prepared.joined.iter().all(|j| j.lattice_angstrom.is_some()));
        assert_eq!(
            prepared.issues,
            vec![RowIssue::MissingEmpirical {
                composition: HEA.to_string(),
                temperature: 300,
                fault: FaultType::Esf,
            }]
        );
    }

    #[test]
    fn test_composition_issues() {
        let targets = vec![
            FE.to_string(),
            "Cr0.50_Co0.50_Fe0.50".to_string(),
            "steel".to_string(),
        ];
        let issues = composition_issues(&targets);
        assert_eq!(issues.len(), 2);
        assert!(matches!(&issues[1], RowIssue::CompositionSum { sum: None, .. }));
    }
}
