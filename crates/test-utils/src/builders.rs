#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use cycledag::config::{
    AssimSection, CompileSection, ConfigFile, ForcingSection, GeneralSection, MemberSection,
    ObservationsSection, PrepSection, RawConfigFile, SystemSection,
};
use cycledag::errors::Result;
use cycledag::types::{InlandWaterScheme, NatureScheme, SeaScheme, SstFormat};

/// Parse a compact `YYYYMMDDHH` date-time group.
pub fn dtg(s: &str) -> NaiveDateTime {
    let date = NaiveDate::parse_from_str(&s[..8], "%Y%m%d").expect("valid YYYYMMDD");
    let hour: u32 = s[8..10].parse().expect("valid HH");
    date.and_hms_opt(hour, 0, 0).expect("valid hour")
}

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from an open-loop configuration: no assimilation, no
/// observations, no compilation.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            config: RawConfigFile {
                general: GeneralSection {
                    case: "test".to_string(),
                    start: dtg(start),
                    end: dtg(end),
                    cycle_length: "3h".to_string(),
                    hh_list: None,
                    ll_list: "3".to_string(),
                    timestep: None,
                    input_cycles_ahead: 3,
                    hours_behind: 24,
                    one_decade: false,
                },
                system: SystemSection {
                    exp_dir: "/exp".to_string(),
                    ..SystemSection::default()
                },
                compile: CompileSection::default(),
                prep: PrepSection::default(),
                forcing: ForcingSection::default(),
                assim: AssimSection::default(),
                observations: ObservationsSection::default(),
                members: BTreeMap::new(),
            },
        }
    }

    pub fn case(mut self, case: &str) -> Self {
        self.config.general.case = case.to_string();
        self
    }

    pub fn cycle_length(mut self, cl: &str) -> Self {
        self.config.general.cycle_length = cl.to_string();
        self
    }

    pub fn hh_list(mut self, hh: &str) -> Self {
        self.config.general.hh_list = Some(hh.to_string());
        self
    }

    pub fn ll_list(mut self, ll: &str) -> Self {
        self.config.general.ll_list = ll.to_string();
        self
    }

    pub fn timestep(mut self, ts: &str) -> Self {
        self.config.general.timestep = Some(ts.to_string());
        self
    }

    pub fn input_cycles_ahead(mut self, n: u32) -> Self {
        self.config.general.input_cycles_ahead = n;
        self
    }

    pub fn hours_behind(mut self, h: u32) -> Self {
        self.config.general.hours_behind = h;
        self
    }

    pub fn one_decade(mut self, val: bool) -> Self {
        self.config.general.one_decade = val;
        self
    }

    pub fn compile(mut self, val: bool) -> Self {
        self.config.compile.build = val;
        self
    }

    pub fn initial_prep(mut self, val: bool) -> Self {
        self.config.prep.initial_prep = val;
        self
    }

    pub fn modify_forcing(mut self, val: bool) -> Self {
        self.config.forcing.modify = val;
        self
    }

    pub fn nature(mut self, scheme: NatureScheme) -> Self {
        self.config.assim.nature.scheme = scheme;
        self
    }

    pub fn sea(mut self, scheme: SeaScheme, format: Option<SstFormat>) -> Self {
        self.config.assim.sea.scheme = scheme;
        self.config.assim.sea.sst_format = format;
        self
    }

    pub fn inland_water(mut self, scheme: InlandWaterScheme, extrapolate: bool) -> Self {
        self.config.assim.inland_water.scheme = scheme;
        self.config.assim.inland_water.extrapolate = extrapolate;
        self
    }

    pub fn ekf(mut self, nncv: &[u8], names: &[&str], llincheck: bool) -> Self {
        self.config.assim.ekf.nncv = nncv.to_vec();
        self.config.assim.ekf.cvar_names = names.iter().map(|s| s.to_string()).collect();
        self.config.assim.ekf.llincheck = llincheck;
        self
    }

    /// NNCO bitmask against the default observation-type table
    /// `T2M, HU2M, WG1, WG2, SWE`.
    pub fn nnco(mut self, nnco: &[u8]) -> Self {
        self.config.observations.nnco = nnco.to_vec();
        self
    }

    pub fn obs_types(mut self, types: &[&str]) -> Self {
        self.config.observations.types = types.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn snow_cycles(mut self, hours: &[u32]) -> Self {
        self.config.observations.snow_cycles = hours.to_vec();
        self
    }

    pub fn cryo_obs(mut self, val: bool) -> Self {
        self.config.observations.cryo_obs = val;
        self
    }

    pub fn mars_archive(mut self, archive: &str) -> Self {
        self.config.observations.mars_archive = Some(archive.to_string());
        self
    }

    pub fn member(mut self, id: &str, hh: Option<&str>, ll: Option<&str>) -> Self {
        self.config.members.insert(
            id.to_string(),
            MemberSection {
                hh_list: hh.map(|s| s.to_string()),
                ll_list: ll.map(|s| s.to_string()),
            },
        );
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
