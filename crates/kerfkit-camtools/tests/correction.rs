use kerfkit_camtools::{CamToolError, CorrectionOptions, CorrectionPipeline, ExteriorPolicy};
use kerfkit_core::SegmentError;
use kerfkit_parser::{BlockPhase, CompensationSide, Orientation};

/// A 100x100 part with a clockwise hole pierced inside and a
/// counter-clockwise hole pierced outside
const PART_WITH_HOLES: &str = "BOF
G90
G00X-10.0Y-10.0
G41
M04
G01X-5.0Y-5.0
G02X+0.0Y+0.0I-5.0J+0.0
G01X+0.0Y+100.0
G01X+100.0Y+100.0
G01X+100.0Y+0.0
G01X+0.0Y+0.0
M03
G40
G00X+25.0Y+25.0
G41
M04
G01X+25.0Y+22.0
G03X+20.0Y+20.0I+25.0J+25.0
G01X+20.0Y+30.0
G01X+30.0Y+30.0
G01X+30.0Y+20.0
G01X+20.0Y+20.0
M03
G40
G00X+55.0Y+60.0
G41
M04
G01X+58.0Y+60.0
G01X+60.0Y+60.0
G01X+80.0Y+60.0
G01X+80.0Y+80.0
G01X+60.0Y+80.0
G01X+60.0Y+60.0
M03
G40
EOF
";

fn pipeline() -> CorrectionPipeline {
    CorrectionPipeline::new(CorrectionOptions::default()).unwrap()
}

#[test]
fn test_part_with_holes_end_to_end() {
    let program = pipeline().process_text(PART_WITH_HOLES).unwrap();

    let expected = PART_WITH_HOLES
        .replacen("G00X+25.0Y+25.0\nG41", "G00X+25.0Y+25.0\nG42", 1)
        .replacen("G00X+55.0Y+60.0", "G00X+65.0Y+60.0", 1);
    assert_eq!(program.text(), expected);

    let report = &program.report;
    assert_eq!(report.summary.blocks, 3);
    assert_eq!(report.summary.holes, 2);
    assert_eq!(report.summary.exteriors, 1);
    assert_eq!(report.summary.unresolved, 0);
    assert_eq!(report.summary.modified, 2);
    assert_eq!(report.summary.compensation_changes, 1);
    assert_eq!(report.summary.lead_in_changes, 1);

    let square_hole = &report.blocks[1];
    assert_eq!(square_hole.orientation, Some(Orientation::Clockwise));
    assert_eq!(square_hole.is_hole, Some(true));
    assert_eq!(square_hole.container_id, Some(0));
    assert_eq!(square_hole.lead_in_inside, Some(true));
    let correction = square_hole.correction.as_ref().unwrap();
    assert_eq!(correction.compensation, Some(CompensationSide::Right));
    assert_eq!(correction.lead_in_line, None);

    let outer = &report.blocks[0];
    assert_eq!(outer.is_hole, Some(false));
    assert!(!outer.modified);
    assert!(report.blocks.iter().all(|b| b.phase == BlockPhase::Finalized));
}

#[test]
fn test_corrected_output_is_stable() {
    let first = pipeline().process_text(PART_WITH_HOLES).unwrap();
    let second = pipeline().process_text(&first.text()).unwrap();
    assert_eq!(second.text(), first.text());
    assert_eq!(second.report.summary.lead_in_changes, 0);
}

#[test]
fn test_circle_is_treated_as_pierced_inside() {
    let text = "G00X-10.0Y-10.0
G41
M04
G01X-5.0Y-5.0
G02X+0.0Y+0.0I-5.0J+0.0
G01X+0.0Y+100.0
G01X+100.0Y+100.0
G01X+100.0Y+0.0
G01X+0.0Y+0.0
M03
G40
G00X+90.0Y+90.0
G41
M04
G01X+56.0Y+50.0
G03X+55.0Y+50.0I+55.5J+50.0
G02X+50.0Y+45.0I+50.0J+50.0
G02X+45.0Y+50.0I+50.0J+50.0
G02X+50.0Y+55.0I+50.0J+50.0
G02X+55.0Y+50.0I+50.0J+50.0
M03
G40
";
    let program = pipeline().process_text(text).unwrap();
    let circle = &program.report.blocks[1];
    assert!(circle.is_circle);
    assert_eq!(circle.lead_in_inside, Some(true));
    assert_eq!(circle.is_hole, Some(true));
    assert_eq!(circle.orientation, Some(Orientation::Clockwise));

    // Inside a hole: compensation only, the pierce point stays
    assert!(program.lines.contains(&"G00X+90.0Y+90.0".to_string()));
    assert!(program.lines.contains(&"G42".to_string()));
}

#[test]
fn test_untouched_program_round_trips() {
    let text = "BOF
G00X-10.0Y-10.0
G41
M04
G01X-5.0Y-5.0
G02X+0.0Y+0.0I-5.0J+0.0
G01X+0.0Y+100.0
G01X+100.0Y+100.0
G01X+100.0Y+0.0
G01X+0.0Y+0.0
M03
G40
G00X+300.0Y+300.0
G00X+190.0Y-10.0
G41
M04
G01X+195.0Y-5.0
G02X+200.0Y+0.0I+195.0J+0.0
G01X+200.0Y+50.0
G01X+250.0Y+50.0
G01X+250.0Y+0.0
G01X+200.0Y+0.0
M03
G40
EOF
";
    let program = pipeline().process_text(text).unwrap();
    assert_eq!(program.text(), text);
    assert_eq!(program.report.summary.modified, 0);
    assert_eq!(program.report.summary.exteriors, 2);
}

#[test]
fn test_degenerate_block_passes_through() {
    let text = "G00X+1.0Y+1.0
G41
M04
G01X+0.0Y+0.0
G03X+2.0Y+0.0I+1.0J+0.0
G01X+5.0Y+5.0
G01X+10.0Y+10.0
M03
G40
";
    let program = pipeline().process_text(text).unwrap();
    assert_eq!(program.text(), text);
    let block = &program.report.blocks[0];
    assert_eq!(block.correction, None);
    assert_eq!(program.report.summary.unresolved, 1);
    assert_eq!(program.report.summary.errors, 1);
}

#[test]
fn test_unclosed_block_fails_the_run() {
    let text = "BOF
G00X+1.0Y+1.0
G41
M04
G01X+0.0Y+0.0
G03X+2.0Y+0.0I+1.0J+0.0
G01X+5.0Y+5.0
EOF
";
    let err = pipeline().process_text(text).unwrap_err();
    assert!(matches!(
        err,
        CamToolError::Segment(SegmentError::MalformedBlock { line_number: 4, .. })
    ));
}

#[test]
fn test_keep_policy_leaves_exterior_compensation() {
    // Exterior square pierced at its own center
    let text = "G00X+5.0Y+5.0
G41
M04
G01X+5.0Y+1.0
G03X+1.0Y+5.0I+5.0J+5.0
G01X+0.0Y+10.0
G01X+10.0Y+10.0
G01X+10.0Y+0.0
G01X+0.0Y+0.0
M03
G40
";
    let options = CorrectionOptions {
        exterior_policy: ExteriorPolicy::Keep,
        ..Default::default()
    };
    let program = CorrectionPipeline::new(options)
        .unwrap()
        .process_text(text)
        .unwrap();
    assert_eq!(program.lines[1], "G41");
    assert_ne!(program.lines[0], "G00X+5.0Y+5.0");

    let mirrored = pipeline().process_text(text).unwrap();
    // Clockwise exterior cuts left under the mirrored rule
    assert_eq!(mirrored.lines[1], "G41");
    assert_eq!(mirrored.lines[0], program.lines[0]);
}
