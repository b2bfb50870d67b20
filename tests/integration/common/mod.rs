#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use nix::unistd::geteuid;

/// Paths of a throwaway daemon setup rooted in a temp directory.
pub struct Sandbox {
    pub config: PathBuf,
    pub pid_file: PathBuf,
    pub helper: PathBuf,
}

impl Sandbox {
    /// Writes a config pointing every path into `dir`.
    pub fn new(dir: &Path) -> Self {
        let pid_file = dir.join("button.pid");
        let helper = dir.join("gpio");
        let sysfs = dir.join("sys");
        fs::write(&helper, "#!/bin/sh\nexit 0\n").expect("failed to write helper");

        let config = dir.join("config.yaml");
        fs::write(
            &config,
            format!(
                "gpio_pin: 17\ngpio_helper: \"{}\"\npid_file: \"{}\"\nsysfs_root: \"{}\"\n",
                helper.display(),
                pid_file.display(),
                sysfs.display()
            ),
        )
        .expect("failed to write config");

        Self {
            config,
            pid_file,
            helper,
        }
    }
}

/// Root would get past the privilege gate and start detaching for real.
pub fn running_as_root() -> bool {
    geteuid().is_root()
}
