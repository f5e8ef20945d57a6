//! G-code text output for toolpaths.
//!
//! Moves are written with one command per line and an explicit feed on
//! every line. Numbers use the toolpath's `decimals`.

use millkit_core::format_number;
use millkit_settings::GCodeSettings;

use crate::toolpath::{Move, MoveKind, Toolpath, ToolpathStep};

/// Renders toolpaths to G-code text.
pub struct GcodeWriter<'a> {
    settings: &'a GCodeSettings,
    output: String,
    next_line: u32,
}

impl<'a> GcodeWriter<'a> {
    pub fn new(settings: &'a GCodeSettings) -> Self {
        Self {
            settings,
            output: String::new(),
            next_line: settings.line_numbers.start,
        }
    }

    /// Absolute positioning, units and the XY plane.
    pub fn write_header(&mut self) {
        if !self.settings.program_header {
            return;
        }
        self.write_comment("Generated by millkit");
        self.write_command("G90");
        self.write_command(self.settings.units.gcode());
        self.write_command("G17");
    }

    pub fn write_footer(&mut self) {
        if self.settings.program_header {
            self.write_command("M30");
        }
    }

    pub fn write_toolpath(&mut self, toolpath: &Toolpath) {
        for step in &toolpath.steps {
            match step {
                ToolpathStep::Move(mv) => {
                    let line = format_move(mv, toolpath.decimals);
                    self.write_command(&line);
                }
                ToolpathStep::Comment(text) => self.write_comment(text),
            }
        }
    }

    pub fn write_comment(&mut self, text: &str) {
        if self.settings.use_comments {
            self.output.push_str("; ");
            self.output.push_str(text);
            self.output.push('\n');
        }
    }

    fn write_command(&mut self, command: &str) {
        let numbering = &self.settings.line_numbers;
        if numbering.enabled {
            self.output.push_str(&format!("N{} ", self.next_line));
            self.next_line = self.next_line.saturating_add(numbering.increment);
        }
        self.output.push_str(command);
        self.output.push('\n');
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// Renders a complete program: header, every toolpath in order, footer.
pub fn to_gcode<'t>(
    toolpaths: impl IntoIterator<Item = &'t Toolpath>,
    settings: &GCodeSettings,
) -> String {
    let mut writer = GcodeWriter::new(settings);
    writer.write_header();
    for toolpath in toolpaths {
        writer.write_toolpath(toolpath);
    }
    writer.write_footer();
    writer.finish()
}

/// One move as a G-code line, without line number.
pub fn format_move(mv: &Move, decimals: usize) -> String {
    let code = match mv.kind {
        MoveKind::Rapid => "G0",
        MoveKind::Linear => "G1",
        MoveKind::ArcCw => "G2",
        MoveKind::ArcCcw => "G3",
    };
    let mut line = String::from(code);
    let words = [
        ('X', mv.x),
        ('Y', mv.y),
        ('Z', mv.z),
        ('I', mv.i),
        ('J', mv.j),
    ];
    for (letter, value) in words {
        if let Some(value) = value {
            line.push(' ');
            line.push(letter);
            line.push_str(&format_number(value, decimals));
        }
    }
    line.push_str(" F");
    line.push_str(&format_number(mv.feed, decimals));
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ArcSegment, Point};
    use crate::operation::MillingDirection;
    use millkit_settings::{LineNumbering, Units};

    fn sample() -> Toolpath {
        let mut tp = Toolpath::new("sample", 3);
        tp.comment("Pass 1");
        tp.push(Move::rapid_z(5.0, 1000.0));
        tp.push(Move::rapid_xy(Point::new(1.0, -0.0), 3000.0));
        tp.push(Move::linear_z(-1.25, 300.0));
        tp
    }

    #[test]
    fn test_format_moves() {
        assert_eq!(format_move(&Move::rapid_z(5.0, 1000.0), 3), "G0 Z5.000 F1000.000");
        assert_eq!(
            format_move(&Move::linear_xy(Point::new(1.23456, -0.0001), 800.0), 2),
            "G1 X1.23 Y0.00 F800.00"
        );
        let arc = ArcSegment::new(
            Point::new(1.0, 0.0),
            Point::new(-1.0, 0.0),
            Point::new(0.0, 0.0),
            MillingDirection::CounterClockwise,
        );
        assert_eq!(
            format_move(&Move::arc(&arc, 500.0), 1),
            "G3 X-1.0 Y0.0 I-1.0 J0.0 F500.0"
        );
    }

    #[test]
    fn test_program_layout() {
        let settings = GCodeSettings::default();
        let text = to_gcode([&sample()], &settings);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "; Generated by millkit",
                "G90",
                "G21",
                "G17",
                "; Pass 1",
                "G0 Z5.000 F1000.000",
                "G0 X1.000 Y0.000 F3000.000",
                "G1 Z-1.250 F300.000",
                "M30",
            ]
        );
    }

    #[test]
    fn test_line_numbers_and_no_comments() {
        let settings = GCodeSettings {
            use_comments: false,
            program_header: false,
            units: Units::Inch,
            line_numbers: LineNumbering {
                enabled: true,
                start: 10,
                increment: 5,
            },
            ..GCodeSettings::default()
        };
        let text = to_gcode([&sample()], &settings);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("N10 G0"));
        assert!(lines[2].starts_with("N20 G1"));
    }
}
