use super::*;
use crate::frame::format::PixelFormat;

fn meta() -> MetadataSnapshot {
    MetadataSnapshot {
        clock_us: 1_700_000_000_123_456,
        pts_us: 5000,
        frame_number: 7,
        format: "I420".to_owned(),
        width: 640,
        height: 480,
        fps: Fps::new(30000, 1001).unwrap(),
    }
}

#[test]
fn expands_pts_and_sequence() {
    assert_eq!(format_payload("ts=%t,n=%n", &meta()), "ts=5000,n=7");
}

#[test]
fn expands_every_recognized_code() {
    assert_eq!(
        format_payload("%c|%t|%n|%f|%w|%h|%r", &meta()),
        "1700000000123456|5000|7|I420|640|480|29.97"
    );
}

#[test]
fn framerate_has_two_fraction_digits() {
    let mut m = meta();
    m.fps = Fps::new(25, 1).unwrap();
    assert_eq!(format_payload("%r", &m), "25.00");
    m.fps = Fps::variable();
    assert_eq!(format_payload("%r", &m), "0.00");
}

#[test]
fn unknown_escapes_are_dropped_with_their_percent() {
    let t = Template::parse("a%xb%%c");
    // `%x` and the `%%` pair are both consumed; the `c` after them stays literal.
    assert_eq!(t.render(&meta()), "abc");
    assert_eq!(
        t.dropped(),
        &[
            DroppedEscape {
                offset: 1,
                code: Some('x')
            },
            DroppedEscape {
                offset: 4,
                code: Some('%')
            },
        ]
    );
}

#[test]
fn trailing_percent_is_dropped() {
    let t = Template::parse("n=%n%");
    assert_eq!(t.render(&meta()), "n=7");
    assert_eq!(
        t.dropped(),
        &[DroppedEscape {
            offset: 4,
            code: None
        }]
    );
}

#[test]
fn output_never_outgrows_literals_plus_fields() {
    let t = Template::parse("%q%q%q%q");
    assert_eq!(t.render(&meta()), "");
    assert_eq!(t.dropped().len(), 4);
}

#[test]
fn multibyte_literals_survive() {
    assert_eq!(format_payload("größe=%w×%h", &meta()), "größe=640×480");
    // A multibyte character after `%` is an unknown escape.
    assert_eq!(format_payload("a%é", &meta()), "a");
}

#[test]
fn fields_are_listed_in_order() {
    let t = Template::parse("%w-%h-%w");
    assert_eq!(
        t.fields().collect::<Vec<_>>(),
        vec![Field::Width, Field::Height, Field::Width]
    );
    assert_eq!(t.source(), "%w-%h-%w");
}

#[test]
fn legacy_template_matches_original_layout() {
    assert_eq!(
        format_payload(LEGACY_TEMPLATE, &meta()),
        "clock=1700000000123456\ntimestamp=5000\nframe=7\nwidth=640\nheight=480\nfps=29.97\nformat=I420\n"
    );
}

#[test]
fn default_template_is_the_timestamp() {
    assert_eq!(format_payload(DEFAULT_TEMPLATE, &meta()), "5000");
}

#[test]
fn capture_copies_frame_description() {
    let info = PixelFormat::Nv12.frame_info(320, 240);
    let m = MetadataSnapshot::capture(&info, 40_000, 1, Fps::new(25, 1).unwrap());
    assert_eq!(m.format, "NV12");
    assert_eq!((m.width, m.height), (320, 240));
    assert_eq!((m.pts_us, m.frame_number), (40_000, 1));
    assert!(m.clock_us > 0);
}
