mod fixtures;

use drvreg_registry::{Generator, Layout, RegistryError};
use fixtures::Project;
use std::fs;

fn run(project: &Project) -> Result<drvreg_registry::GenerationReport, RegistryError> {
    Generator::builder().project_root(project.root()).build()?.run()
}

#[test]
fn test_enabled_and_disabled_drivers_end_up_in_both_outputs() {
    let project = Project::with_sources(&["path/a.c", "path/b.c", "path/c.c"]);
    project.registry("a = true\nb = false\nc = true\n");

    let report = run(&project).unwrap();
    assert_eq!((report.enabled, report.total), (2, 3));

    assert_eq!(
        project.fragment().unwrap(),
        "# Auto-generated. Do not edit.\nDRIVERS := path/a.c path/c.c\n"
    );
    let header = project.header().unwrap();
    assert!(header.contains("#define DRIVER_A 1\n#define DRIVER_B 0\n#define DRIVER_C 1\n"));
}

#[test]
fn test_missing_enabled_driver_writes_nothing() {
    let project = Project::with_sources(&["fb.c"]);
    project.registry("fb = true\na = true\n");

    let err = run(&project).unwrap_err();

    assert!(matches!(err, RegistryError::DriverNotFound { ref name, .. } if name == "a"));
    assert!(project.fragment().is_none());
    assert!(project.header().is_none());
}

#[test]
fn test_failed_run_keeps_previous_outputs() {
    let project = Project::with_sources(&["fb.c"]);
    project.registry("fb = true\n");
    run(&project).unwrap();
    let before = (project.fragment(), project.header());

    project.registry("fb = true\nnvme = true\n");
    assert!(run(&project).is_err());

    assert_eq!((project.fragment(), project.header()), before);
    let leftovers = fs::read_dir(project.drivers())
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().contains(".drvregtmp."))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn test_registry_order_beats_alphabetical_and_traversal_order() {
    let project = Project::with_sources(&["m/m.c", "a.c", "z/deep/z.c"]);
    project.registry("z = true\na = true\nm = true\n");

    run(&project).unwrap();

    assert!(project.fragment().unwrap().ends_with("DRIVERS := z/deep/z.c a.c m/m.c\n"));
    assert!(
        project
            .header()
            .unwrap()
            .contains("#define DRIVER_Z 1\n#define DRIVER_A 1\n#define DRIVER_M 1\n")
    );
}

#[test]
fn test_disabled_driver_without_source_is_still_declared() {
    let project = Project::with_sources(&["fb.c"]);
    project.registry("fb = false\nsound = false\n");

    run(&project).unwrap();

    assert_eq!(project.fragment().unwrap(), "# Auto-generated. Do not edit.\nDRIVERS := \n");
    assert!(project.header().unwrap().contains("#define DRIVER_FB 0\n#define DRIVER_SOUND 0\n"));
}

#[test]
fn test_second_run_is_byte_identical() {
    let project = Project::with_sources(&["fb.c", "vt/vt.c", "rtc.c"]);
    project.registry("vt = true\nfb = true\nrtc = false\n");

    run(&project).unwrap();
    let first = (project.fragment().unwrap(), project.header().unwrap());
    run(&project).unwrap();
    let second = (project.fragment().unwrap(), project.header().unwrap());

    assert_eq!(first, second);
}

#[test]
fn test_empty_registry_succeeds_with_empty_bodies() {
    let project = Project::with_sources(&["fb.c"]);
    project.registry("");

    let report = run(&project).unwrap();

    assert_eq!(report.total, 0);
    assert_eq!(project.fragment().unwrap(), "# Auto-generated. Do not edit.\nDRIVERS := \n");
    assert_eq!(
        project.header().unwrap(),
        "// Auto-generated. Do not edit.\n#ifndef DRIVERS_ENABLED_H\n#define DRIVERS_ENABLED_H\n\n\n#endif\n"
    );
}

#[test]
fn test_missing_registry_is_reported_before_scanning() {
    let project = Project::with_sources(&[]);
    fs::remove_dir_all(project.drivers()).unwrap();

    let err = run(&project).unwrap_err();

    assert!(matches!(err, RegistryError::ConfigNotFound { .. }));
}

#[test]
fn test_malformed_registry_is_a_parse_error() {
    let project = Project::with_sources(&["fb.c"]);
    project.write("drivers/registry.toml", "[drivers]\nfb = maybe\n");

    let err = run(&project).unwrap_err();

    assert!(matches!(err, RegistryError::ConfigParse { .. }));
    assert!(err.to_string().contains("registry.toml"), "message should name the file: {err}");
}

#[test]
fn test_duplicate_base_names_abort_the_run() {
    let project = Project::with_sources(&["net/serial.c", "tty/serial.c"]);
    project.registry("serial = true\n");

    let err = run(&project).unwrap_err();

    assert!(matches!(err, RegistryError::DuplicateDriverName { ref name, .. } if name == "serial"));
    assert!(project.fragment().is_none());
}

#[test]
fn test_case_colliding_names_abort_the_run() {
    let project = Project::with_sources(&["fb.c"]);
    project.registry("fb = true\nFB = false\n");

    let err = run(&project).unwrap_err();

    assert!(err.to_string().contains("'fb' and 'FB'"), "message should name both entries: {err}");
    assert!(project.header().is_none());
}

#[cfg(unix)]
#[test]
fn test_symlinked_source_resolves() {
    let project = Project::with_sources(&[]);
    project.write("real_uart.c", "");
    std::os::unix::fs::symlink("../real_uart.c", project.drivers().join("uart.c")).unwrap();
    project.registry("uart = true\n");

    run(&project).unwrap();

    assert!(project.fragment().unwrap().ends_with("DRIVERS := uart.c\n"));
}

#[test]
fn test_only_matching_extension_is_scanned() {
    let project = Project::with_sources(&["fb.c", "fb_impl.h", "README.md"]);
    project.registry("fb = true\n");

    run(&project).unwrap();
    // Outputs of a previous run sit in the tree and must not be picked up.
    run(&project).unwrap();

    assert!(project.fragment().unwrap().ends_with("DRIVERS := fb.c\n"));
}

#[test]
fn test_custom_layout_file_is_honoured() {
    let project = Project::with_sources(&[]);
    project.write("src/dev/uart.cc", "");
    project.write("src/dev/kdrivers.toml", "[drivers]\nuart = true\n");
    project.write(
        "drvreg.toml",
        "driver_dir = \"src/dev\"\nregistry = \"kdrivers.toml\"\nextension = \"cc\"\n\
         build_fragment = \"gen/drivers.mk\"\nheader = \"gen/drivers.h\"\n\
         build_variable = \"KSRCS\"\nmacro_prefix = \"CONFIG_\"\ninclude_guard = \"GEN_DRIVERS_H\"\n",
    );

    let layout = Layout::load(project.root().join(drvreg_registry::LAYOUT_FILE), false).unwrap();
    let report =
        Generator::builder().project_root(project.root()).layout(layout).build().unwrap().run().unwrap();

    assert_eq!(report.build_fragment, project.root().join("src/dev/gen/drivers.mk"));
    assert!(fs::read_to_string(&report.build_fragment).unwrap().ends_with("KSRCS := uart.cc\n"));
    let header = fs::read_to_string(&report.header).unwrap();
    assert!(header.contains("#ifndef GEN_DRIVERS_H\n"));
    assert!(header.contains("#define CONFIG_UART 1\n"));
}
