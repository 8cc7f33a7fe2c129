use std::path::{Path, PathBuf};

/// Toggle that marks a job as overriding the transition matrix; it changes the
/// job name so that overridden runs never clobber regular ones.
pub const TRANSITION_OVERRIDE: &str = "transition_override";

/// Physical system of a square-well run: well width, filling fraction and
/// particle count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemId {
    pub ww: f64,
    pub ff: f64,
    pub n: u32,
}

impl SystemId {
    pub fn new(ww: f64, ff: f64, n: u32) -> Self {
        Self { ww, ff, n }
    }

    /// `periodic-ww130-ff30-N25`, the prefix shared by every figure of a system.
    pub fn figure_stem(&self) -> String {
        format!(
            "periodic-ww{:02}-ff{:02}-N{}",
            (self.ww * 100.0).round() as i64,
            (self.ff * 100.0).round() as i64,
            self.n
        )
    }

    pub fn run(&self, method: &str) -> RunId {
        RunId {
            system: *self,
            method: method.to_string(),
        }
    }
}

/// A system simulated with one sampling method.
#[derive(Debug, Clone, PartialEq)]
pub struct RunId {
    pub system: SystemId,
    pub method: String,
}

impl RunId {
    /// `periodic-ww1.30-ff0.30-N25-tmmc`
    pub fn stem(&self) -> String {
        format!(
            "periodic-ww{:04.2}-ff{:04.2}-N{}-{}",
            self.system.ww, self.system.ff, self.system.n, self.method
        )
    }

    pub fn energy_histogram_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}-E.dat", self.stem()))
    }

    pub fn log_weights_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}-lnw.dat", self.stem()))
    }
}

/// Name under which a simulator job is scripted, logged and submitted.
pub fn job_name(run: &RunId, toggles: &[String], suffix: Option<&str>) -> String {
    let mut name = run.stem();
    if toggles.iter().any(|t| t == TRANSITION_OVERRIDE) {
        name.push_str("-to");
    }
    if let Some(suffix) = suffix.filter(|s| !s.is_empty()) {
        name.push('-');
        name.push_str(suffix);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_stem_pads_parameters() {
        let run = SystemId::new(1.3, 0.3, 25).run("tmmc");
        assert_eq!(run.stem(), "periodic-ww1.30-ff0.30-N25-tmmc");
        assert_eq!(
            run.energy_histogram_path(Path::new("data")),
            PathBuf::from("data/periodic-ww1.30-ff0.30-N25-tmmc-E.dat")
        );
        assert_eq!(
            run.log_weights_path(Path::new("data")),
            PathBuf::from("data/periodic-ww1.30-ff0.30-N25-tmmc-lnw.dat")
        );
    }

    #[test]
    fn figure_stem_uses_percentages() {
        assert_eq!(SystemId::new(1.3, 0.3, 5).figure_stem(), "periodic-ww130-ff30-N5");
        assert_eq!(SystemId::new(2.0, 0.05, 12).figure_stem(), "periodic-ww200-ff05-N12");
    }

    #[test]
    fn job_name_reflects_toggles_and_suffix() {
        let run = SystemId::new(1.5, 0.3, 10).run("wang_landau");
        assert_eq!(job_name(&run, &[], None), "periodic-ww1.50-ff0.30-N10-wang_landau");
        assert_eq!(
            job_name(&run, &["transition_override".to_string()], Some("seed2")),
            "periodic-ww1.50-ff0.30-N10-wang_landau-to-seed2"
        );
        assert_eq!(
            job_name(&run, &["tmi".to_string()], Some("")),
            "periodic-ww1.50-ff0.30-N10-wang_landau"
        );
    }
}
