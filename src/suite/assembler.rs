// src/suite/assembler.rs

//! Builds the suite tree for a validated configuration.
//!
//! Two passes:
//! 1. Forward, in ascending basetime order: static families, then one
//!    family per cycle with its look-ahead gate, recording cycle handles.
//! 2. Finalize: once every cycle exists, each CycleInput family gets an
//!    extra clause on the PostProcessing of the cycle `hours_behind`
//!    earlier.
//!
//! Any error aborts the build; no partial tree is returned.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info};

use crate::config::{ConfigFile, ListUnit};
use crate::cycle::{Cycle, cycles_from_config, get_total_unique_hh_list, member_schedules};
use crate::dag::{Mode, NodeId, NodeKind, SuiteTree, TriggerExpr, check_node_name};
use crate::errors::Result;
use crate::suite::handles::{CycleHandle, CycleHandles};
use crate::suite::perturbations::perturbation_plan;
use crate::suite::predicates::{
    active_obs_vars, cold_start, decades_between, do_soda, ekf_active, lookahead_basetime,
    lookbehind_basetime, needs_cryo_clim, needs_fetch_mars_obs, needs_prepare_lsm,
    needs_prepare_sst, oi_active,
};
use crate::suite::registry::{TaskContext, TaskRegistry};
use crate::types::ObsVariable;

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct Suite {
    pub tree: SuiteTree,
    pub cycles: Vec<Cycle>,
    /// Distinct start offsets (minutes after midnight) across all members.
    pub unique_offsets: Vec<i64>,
}

/// Assembles one suite from one configuration.
#[derive(Debug)]
pub struct SuiteAssembler<'a> {
    cfg: &'a ConfigFile,
    registry: &'a TaskRegistry,
    suite_name: String,
}

impl<'a> SuiteAssembler<'a> {
    pub fn new(cfg: &'a ConfigFile, registry: &'a TaskRegistry) -> Self {
        Self {
            cfg,
            registry,
            suite_name: cfg.suite_name().to_string(),
        }
    }

    /// Use `name` for the root node instead of `general.case`.
    pub fn with_suite_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    pub fn build(&self) -> Result<Suite> {
        check_node_name(&self.suite_name)?;

        // Cycles are resolved before the tree exists so that enumeration
        // failures never leave a half-built suite behind.
        let schedules = member_schedules(self.cfg)?;
        let unique_offsets = get_total_unique_hh_list(&schedules);
        let cycles = cycles_from_config(self.cfg)?;
        info!(
            suite = %self.suite_name,
            cycles = cycles.len(),
            members = schedules.len(),
            unique_hours = unique_offsets.len(),
            "assembling suite"
        );

        let mut builder = Builder {
            cfg: self.cfg,
            registry: self.registry,
            tree: SuiteTree::new(&self.suite_name),
            handles: CycleHandles::new(),
            work_dir: self.cfg.system.effective_work_dir(),
        };
        builder.forward(&cycles)?;
        builder.finalize(&cycles);

        info!(nodes = builder.tree.len(), "suite assembled");
        Ok(Suite {
            tree: builder.tree,
            cycles,
            unique_offsets,
        })
    }
}

/// Family name of the cycle starting at `basetime`.
pub fn cycle_family_name(basetime: NaiveDateTime, unit: ListUnit) -> String {
    match unit {
        ListUnit::Hours => basetime.format("%Y%m%d%H").to_string(),
        ListUnit::SubHourly => basetime.format("%Y%m%d%H%M").to_string(),
    }
}

fn format_interval(interval: Duration, unit: ListUnit) -> String {
    match unit {
        ListUnit::Hours => interval.num_hours().to_string(),
        ListUnit::SubHourly => interval.num_minutes().to_string(),
    }
}

/// Per-build mutable state.
struct Builder<'a> {
    cfg: &'a ConfigFile,
    registry: &'a TaskRegistry,
    tree: SuiteTree,
    handles: CycleHandles,
    work_dir: String,
}

impl Builder<'_> {
    fn complete(&self, id: NodeId) -> Option<TriggerExpr> {
        Some(TriggerExpr::complete(self.tree.path(id)))
    }

    fn add_family(&mut self, parent: NodeId, name: &str, gate: TriggerExpr) -> Result<NodeId> {
        let id = self.tree.add_child(parent, name, NodeKind::Family)?;
        self.tree.attach_gate(id, gate);
        Ok(id)
    }

    fn add_task(&mut self, parent: NodeId, name: &str, gate: TriggerExpr) -> Result<NodeId> {
        self.add_task_with_args(parent, name, gate, "")
    }

    fn add_task_with_args(
        &mut self,
        parent: NodeId,
        name: &str,
        gate: TriggerExpr,
        args: &str,
    ) -> Result<NodeId> {
        let factory = self.registry.lookup(name)?;
        let id = self.tree.add_child(parent, name, NodeKind::Task)?;
        self.tree.attach_gate(id, gate);

        let vars = factory(&TaskContext {
            name,
            node_path: self.tree.path(id),
            work_dir: &self.work_dir,
            args,
        });
        for (key, value) in vars {
            self.tree.add_variable(id, &key, value);
        }
        Ok(id)
    }

    fn forward(&mut self, cycles: &[Cycle]) -> Result<()> {
        let root = self.tree.root();
        self.add_root_variables();

        let init_run = self.add_task(root, "InitRun", TriggerExpr::empty())?;
        let init_run_complete = self.complete(init_run);

        let compile_complete = if self.cfg.compile.build {
            let compilation = self.add_family(
                root,
                "Compilation",
                TriggerExpr::all([init_run_complete.clone()]),
            )?;
            let sync = self.add_task(compilation, "SyncSourceCode", TriggerExpr::empty())?;
            let configure = self.add_task(
                compilation,
                "ConfigureOfflineBinaries",
                TriggerExpr::all([self.complete(sync)]),
            )?;
            self.add_task(
                compilation,
                "MakeOfflineBinaries",
                TriggerExpr::all([self.complete(configure)]),
            )?;
            self.complete(compilation)
        } else {
            None
        };

        let static_data = self.add_family(
            root,
            "StaticData",
            TriggerExpr::all([init_run_complete.clone(), compile_complete]),
        )?;
        self.build_static_data(static_data)?;
        let static_complete = self.complete(static_data);

        for cycle in cycles {
            self.build_cycle(cycle, &init_run_complete, &static_complete)?;
        }
        Ok(())
    }

    fn add_root_variables(&mut self) {
        let root = self.tree.root();
        let system = &self.cfg.system;
        let ecf_files = system.effective_ecf_files();
        let joboutdir = system.effective_joboutdir();
        let vars = [
            ("ARGS", String::new()),
            ("CASE", self.tree.node(root).name.clone()),
            ("DTGBEG", self.cfg.start().format("%Y%m%d%H").to_string()),
            ("DTGEND", self.cfg.end().format("%Y%m%d%H").to_string()),
            ("ECF_EXTN", ".py".to_string()),
            ("ECF_FILES", ecf_files.clone()),
            ("ECF_HOME", joboutdir.clone()),
            ("ECF_INCLUDE", ecf_files),
            ("ECF_OUT", joboutdir),
            ("ECF_TRIES", system.ecf_tries.to_string()),
            ("EXP_DIR", system.exp_dir.clone()),
        ];
        for (key, value) in vars {
            self.tree.add_variable(root, key, value);
        }
    }

    fn build_static_data(&mut self, static_data: NodeId) -> Result<()> {
        if !self.cfg.general.one_decade {
            self.add_task(static_data, "Pgd", TriggerExpr::empty())?;
            return Ok(());
        }

        for decade in decades_between(self.cfg.start(), self.cfg.end()) {
            let stamp = decade.format("%Y%m%d").to_string();
            let family = self.add_family(static_data, &format!("Decade{stamp}"), TriggerExpr::empty())?;
            self.tree.add_variable(family, "DECADE", stamp);
            self.add_task(family, "Pgd", TriggerExpr::empty())?;
        }
        Ok(())
    }

    fn build_cycle(
        &mut self,
        cycle: &Cycle,
        init_run_complete: &Option<TriggerExpr>,
        static_complete: &Option<TriggerExpr>,
    ) -> Result<()> {
        let root = self.tree.root();
        let unit = self.cfg.list_unit();
        let basetime = cycle.basetime;
        let name = cycle_family_name(basetime, unit);

        let lookahead = lookahead_basetime(
            self.cfg.start(),
            basetime,
            cycle.interval,
            self.cfg.general.input_cycles_ahead,
        )
        .and_then(|earlier| self.handles.lookup(earlier))
        .map(|handle| TriggerExpr::complete(self.tree.path(handle.prediction)));
        debug!(cycle = %name, lookahead = lookahead.is_some(), "building cycle");

        let family = self.add_family(
            root,
            &name,
            TriggerExpr::all([init_run_complete.clone(), static_complete.clone(), lookahead]),
        )?;
        self.tree.add_variable(family, "DTG", name.clone());
        self.tree
            .add_variable(family, "FCINT", format_interval(cycle.interval, unit));
        self.tree.add_variable(family, "LL", format_interval(cycle.lead, unit));

        let prepare_cycle = self.add_task(family, "PrepareCycle", TriggerExpr::empty())?;

        let cycle_input = self.add_family(
            family,
            "CycleInput",
            TriggerExpr::all([self.complete(prepare_cycle)]),
        )?;
        let forcing = self.add_task(cycle_input, "Forcing", TriggerExpr::empty())?;
        if self.cfg.forcing.modify {
            self.add_task(
                cycle_input,
                "ModifyForcing",
                TriggerExpr::all([self.complete(forcing)]),
            )?;
        }

        let initialization = self.add_family(family, "Initialization", TriggerExpr::empty())?;
        let analysis_ran = self.build_initialization(initialization, basetime)?;

        let prediction = self.add_family(
            family,
            "Prediction",
            TriggerExpr::all([self.complete(cycle_input), self.complete(initialization)]),
        )?;
        let forecast = self.add_task(prediction, "Forecast", TriggerExpr::empty())?;
        self.add_task(
            prediction,
            "LogProgress",
            TriggerExpr::all([self.complete(forecast)]),
        )?;

        let post_processing = self.add_family(
            family,
            "PostProcessing",
            TriggerExpr::all([self.complete(prediction)]),
        )?;
        let log_gate = if analysis_ran {
            let qc2obsmon = self.add_task(post_processing, "Qc2obsmon", TriggerExpr::empty())?;
            TriggerExpr::all([self.complete(qc2obsmon)])
        } else {
            TriggerExpr::empty()
        };
        self.add_task(post_processing, "LogProgressPP", log_gate)?;

        self.handles.insert(
            basetime,
            CycleHandle {
                cycle_input,
                prediction,
                post_processing,
            },
        );
        Ok(())
    }

    /// Fill the Initialization family. Returns whether an Analysis branch ran.
    fn build_initialization(&mut self, init: NodeId, basetime: NaiveDateTime) -> Result<bool> {
        if cold_start(self.cfg, basetime) {
            self.add_task(init, "OfflinePrep", TriggerExpr::empty())?;
            return Ok(false);
        }

        if !do_soda(self.cfg, basetime) {
            self.add_task(init, "CycleFirstGuess", TriggerExpr::empty())?;
            return Ok(false);
        }

        let first_guess = self.add_task(init, "FirstGuess", TriggerExpr::empty())?;

        let perturbations = if ekf_active(self.cfg) {
            Some(self.build_perturbations(init)?)
        } else {
            None
        };

        let (oi_soil, oi_climate) = if oi_active(self.cfg) {
            (
                Some(self.add_task(init, "PrepareOiSoilInput", TriggerExpr::empty())?),
                Some(self.add_task(init, "PrepareOiClimate", TriggerExpr::empty())?),
            )
        } else {
            (None, None)
        };

        let sst = if needs_prepare_sst(self.cfg) {
            Some(self.add_task(init, "PrepareSST", TriggerExpr::empty())?)
        } else {
            None
        };

        // Gated on FirstGuess4OI once the Analysis family exists.
        let lsm = if needs_prepare_lsm(self.cfg) {
            Some(self.add_task(init, "PrepareLSM", TriggerExpr::empty())?)
        } else {
            None
        };

        let (first_guess_4oi, oi2soda) = self.build_analysis(init, basetime)?;
        if let Some(lsm) = lsm {
            let gate = TriggerExpr::all([self.complete(first_guess_4oi)]);
            self.tree.append_gate(lsm, gate, Mode::And);
        }

        let soda_gate = TriggerExpr::all(
            [
                Some(first_guess),
                oi2soda,
                perturbations,
                oi_soil,
                oi_climate,
                sst,
                lsm,
            ]
            .into_iter()
            .map(|id| id.and_then(|id| self.complete(id))),
        );
        self.add_task(init, "Soda", soda_gate)?;
        Ok(true)
    }

    fn build_perturbations(&mut self, init: NodeId) -> Result<NodeId> {
        let perturbations = self.add_family(init, "Perturbations", TriggerExpr::empty())?;
        for branch in perturbation_plan(&self.cfg.assim.ekf) {
            let branch_family = self.add_family(perturbations, &branch.name, TriggerExpr::empty())?;
            for run in &branch.runs {
                let parent = match run.sign.family_name() {
                    Some(sign) => self.add_family(branch_family, sign, TriggerExpr::empty())?,
                    None => branch_family,
                };
                self.add_task_with_args(parent, "PerturbedRun", TriggerExpr::empty(), &run.args())?;
            }
        }
        Ok(perturbations)
    }

    /// Build the Analysis family. Returns FirstGuess4OI and, if any variable
    /// branch ran, Oi2soda.
    fn build_analysis(
        &mut self,
        init: NodeId,
        basetime: NaiveDateTime,
    ) -> Result<(NodeId, Option<NodeId>)> {
        let vars = active_obs_vars(self.cfg, basetime);
        let analysis = self.add_family(init, "Analysis", TriggerExpr::empty())?;

        let first_guess_4oi = self.add_task(analysis, "FirstGuess4OI", TriggerExpr::empty())?;
        let fg4oi_complete = self.complete(first_guess_4oi);

        let cryo = if needs_cryo_clim(self.cfg) {
            Some(self.add_task(
                analysis,
                "CryoClim2json",
                TriggerExpr::all([fg4oi_complete.clone()]),
            )?)
        } else {
            None
        };

        let mars = if needs_fetch_mars_obs(self.cfg, &vars) {
            Some(self.add_task(analysis, "FetchMarsObs", TriggerExpr::empty())?)
        } else {
            None
        };

        let mut var_families = Vec::with_capacity(vars.len());
        for var in vars {
            let var_name = var.var_name();
            let family = self.add_family(analysis, var_name, TriggerExpr::empty())?;
            self.tree.add_variable(family, "VAR_NAME", var_name);

            let qc_gate = if var == ObsVariable::SnowDepth {
                TriggerExpr::all([
                    fg4oi_complete.clone(),
                    mars.and_then(|id| self.complete(id)),
                    cryo.and_then(|id| self.complete(id)),
                ])
            } else {
                TriggerExpr::empty()
            };
            let args = format!("var_name={var_name}");
            let qc = self.add_task_with_args(family, "QualityControl", qc_gate, &args)?;
            self.add_task_with_args(
                family,
                "OptimalInterpolation",
                TriggerExpr::all([self.complete(qc)]),
                &args,
            )?;
            var_families.push(self.complete(family));
        }

        let oi2soda = if var_families.is_empty() {
            None
        } else {
            Some(self.add_task(analysis, "Oi2soda", TriggerExpr::all(var_families))?)
        };

        Ok((first_guess_4oi, oi2soda))
    }

    fn finalize(&mut self, cycles: &[Cycle]) {
        let hours_behind = self.cfg.general.hours_behind;
        for cycle in cycles {
            let Some(current) = self.handles.lookup(cycle.basetime).copied() else {
                continue;
            };
            let Some(earlier) = lookbehind_basetime(cycle.basetime, hours_behind)
                .and_then(|b| self.handles.lookup(b))
                .copied()
            else {
                continue;
            };
            let gate = TriggerExpr::complete(self.tree.path(earlier.post_processing));
            debug!(
                cycle_input = %self.tree.path(current.cycle_input),
                "adding look-behind trigger"
            );
            self.tree.append_gate(current.cycle_input, gate, Mode::And);
        }
    }
}
