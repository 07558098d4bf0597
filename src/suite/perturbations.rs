// src/suite/perturbations.rs

//! Ensemble perturbation fan-out for the EKF soil analysis.
//!
//! Task bodies decode the `pert` number positionally, so the numbering
//! `fan * len(nncv) + ivar + 1` must not change.

use crate::config::EkfSection;

/// Sign of a perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PertSign {
    /// Single-sided perturbation (no linearity check).
    None,
    Pos,
    Neg,
}

impl PertSign {
    pub fn as_str(self) -> &'static str {
        match self {
            PertSign::None => "none",
            PertSign::Pos => "pos",
            PertSign::Neg => "neg",
        }
    }

    /// Sub-family the run is placed in, if any.
    pub fn family_name(self) -> Option<&'static str> {
        match self {
            PertSign::None => None,
            PertSign::Pos => Some("Pos"),
            PertSign::Neg => Some("Neg"),
        }
    }

    pub fn fan_index(self) -> usize {
        match self {
            PertSign::None | PertSign::Pos => 0,
            PertSign::Neg => 1,
        }
    }
}

/// One PerturbedRun task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerturbedRun {
    pub pert: usize,
    pub name: String,
    pub ivar: usize,
    pub sign: PertSign,
}

impl PerturbedRun {
    /// The unperturbed reference run.
    pub fn reference() -> Self {
        Self {
            pert: 0,
            name: "REF".to_string(),
            ivar: 0,
            sign: PertSign::None,
        }
    }

    /// Encode as the task's `ARGS` value.
    pub fn args(&self) -> String {
        format!(
            "pert={};name={};ivar={};pert_sign={}",
            self.pert,
            self.name,
            self.ivar,
            self.sign.as_str()
        )
    }
}

/// Number of a perturbed run for control variable `ivar`.
pub fn pert_index(sign: PertSign, nvar: usize, ivar: usize) -> usize {
    sign.fan_index() * nvar + ivar + 1
}

/// Sub-family of the Perturbations family and the runs it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerturbationBranch {
    pub name: String,
    pub runs: Vec<PerturbedRun>,
}

/// Branches in creation order: `REF` first, then one per active control
/// variable after slot 0.
pub fn perturbation_plan(ekf: &EkfSection) -> Vec<PerturbationBranch> {
    let nvar = ekf.nncv.len();
    let signs: &[PertSign] = if ekf.llincheck {
        &[PertSign::Pos, PertSign::Neg]
    } else {
        &[PertSign::None]
    };

    let mut branches = vec![PerturbationBranch {
        name: "REF".to_string(),
        runs: vec![PerturbedRun::reference()],
    }];

    for (ivar, flag) in ekf.nncv.iter().enumerate().skip(1) {
        if *flag != 1 {
            continue;
        }
        let name = ekf
            .cvar_names
            .get(ivar)
            .cloned()
            .unwrap_or_else(|| format!("CV{ivar}"));
        let runs = signs
            .iter()
            .map(|sign| PerturbedRun {
                pert: pert_index(*sign, nvar, ivar),
                name: name.clone(),
                ivar,
                sign: *sign,
            })
            .collect();
        branches.push(PerturbationBranch { name, runs });
    }

    branches
}
