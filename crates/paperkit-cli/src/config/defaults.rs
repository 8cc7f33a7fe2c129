pub struct DefaultsConfig {
    pub data_dir: &'static str,
    pub figs_dir: &'static str,
    pub jobs_dir: &'static str,
    pub project_dir: &'static str,
    pub max_temperature: f64,
    pub temperature_bins: usize,
    pub reference: &'static str,
    pub simulator: &'static str,
    pub build_command: &'static str,
    pub cores: usize,
    pub submit: bool,
    pub memory_per_particle: u64,
    pub submit_command: &'static str,
    pub python: &'static str,
    pub melting_program: &'static str,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            data_dir: "data",
            figs_dir: "figs",
            jobs_dir: "jobs",
            project_dir: ".",
            max_temperature: 1.4,
            temperature_bins: 1000,
            reference: "tmmc-golden",
            simulator: "square-well-monte-carlo",
            build_command: "scons",
            cores: 4,
            submit: false,
            memory_per_particle: 20,
            submit_command: "sbatch",
            python: "python",
            melting_program: "figs/new-melting.mkdat",
        }
    }
}
