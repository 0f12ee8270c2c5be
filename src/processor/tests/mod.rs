//! Integration tests for the processor module
//!
//! Run the full pipeline against small SWMM models written to temp dirs.

pub mod basic_processing;

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const NETWORK: &str = r#"[TITLE]
Two junctions and a pump

[JUNCTIONS]
;;Name           Elevation  MaxDepth   InitDepth  SurDepth   Aponded
J1               100        10         0          0          0
J2               95         10         0          0          0

[OUTFALLS]
;;Name           Elevation  Type       Stage Data       Gated    Route To
O1               90         FREE                        NO

[CONDUITS]
;;Name           From Node        To Node          Length     Roughness  InOffset   OutOffset  InitFlow   MaxFlow
C1               J1               J2               400        0.01       0          0          0          0
C2               J2               O1               300        0.01       0          0          0          0

[PUMPS]
;;Name           From Node        To Node          Pump Curve       Status   Sartup Shutoff
P1               J2               J1               *                ON       0      0

[XSECTIONS]
;;Link           Shape        Geom1            Geom2      Geom3      Geom4      Barrels
C1               CIRCULAR     1                0          0          0          1
C2               CIRCULAR     1.5              0          0          0          1

[COORDINATES]
;;Node           X-Coord            Y-Coord
J1               0.000              0.000
J2               10.000             0.000
O1               20.000             -5.000

[VERTICES]
;;Link           X-Coord            Y-Coord
C2               15.0               -1.0
"#;

pub const REPORT: &str = r#"
  EPA STORM WATER MANAGEMENT MODEL - VERSION 5.1 (Build 5.1.015)
  --------------------------------------------------------------

  *******************
  Node Depth Summary
  *******************

  ---------------------------------------------------------------------------------
                                 Average  Maximum  Maximum  Time of Max    Reported
                                   Depth    Depth      HGL   Occurrence   Max Depth
  Node                 Type         Feet     Feet     Feet  days hr:min        Feet
  ---------------------------------------------------------------------------------
  J1                   JUNCTION     0.21     1.02   101.02     0  10:00        1.02
  J2                   JUNCTION     0.30     1.50    96.50     0  10:05        1.50
  O1                   OUTFALL      0.10     0.40    90.40     0  10:07        0.40

  ***********************
  Link Flow Summary
  ***********************

  -----------------------------------------------------------------------------
                                 Maximum  Time of Max   Maximum    Max/    Max/
                                  |Flow|   Occurrence   |Veloc|    Full    Full
  Link                 Type          CFS  days hr:min    ft/sec    Flow   Depth
  -----------------------------------------------------------------------------
  C1                   CONDUIT     12.30     0  10:01      4.10    0.80    0.65
  C2                   CONDUIT      9.80     0  10:04      3.20    0.55    0.50
  P1                   PUMP         3.00     0  09:00                0.50

"#;

/// Write the network and report files, returning their paths
pub fn write_model(
    temp_dir: &TempDir,
    network: &str,
    report: Option<&str>,
) -> (PathBuf, Option<PathBuf>) {
    let inp_path = temp_dir.path().join("network.inp");
    fs::write(&inp_path, network).unwrap();

    let rpt_path = report.map(|content| {
        let path = temp_dir.path().join("network.rpt");
        fs::write(&path, content).unwrap();
        path
    });

    (inp_path, rpt_path)
}
