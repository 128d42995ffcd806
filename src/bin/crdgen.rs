//! A script used to generate the CRD used by this project.
//!
//! Any time the CRD spec changes, this script can be run to ensure that the
//! CRD is up-to-date and ready to be synced with the cluster.

use anyhow::{Context, Result};
use kube::CustomResourceExt;
use oam_core::crd::Application;

fn main() -> Result<()> {
    let canon = std::fs::canonicalize(".").context("error getting canonical path of current dir")?;
    let crds_path = canon.join("k8s").join("crds");
    std::fs::create_dir_all(&crds_path).with_context(|| format!("error creating CRD output dir {:?}", &crds_path))?;

    let application = Application::crd();
    let application_yaml = serde_yaml::to_string(&application).context("error serializing Application CRD to yaml")?;
    std::fs::write(crds_path.join("application.yaml"), &application_yaml).with_context(|| format!("error writing Application CRD to {:?}", &crds_path))?;
    println!("Application CRD written to {:?}", &crds_path);

    Ok(())
}
