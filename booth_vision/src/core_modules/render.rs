// THEORY:
// Some outputs are not buffers but drawing instructions: pixelation re-renders each
// tile as a circle, and the live overlays (nose marker, face box) are shapes drawn
// on top of whatever the cell already shows. `RenderCommand` is that small drawing
// vocabulary. Producers emit commands in their own local coordinates; the canvas
// executes them after translating into the cell they belong to.

/// An RGBA colour on the 0..255 scale, kept as floats so averages stay exact until
/// they are rasterised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Paint {
    pub fn rgba(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self { red, green, blue, alpha }
    }

    pub fn gray(value: f32) -> Self {
        Self::rgba(value, value, value, 255.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Filled circle, no stroke.
    FillCircle {
        cx: f32,
        cy: f32,
        diameter: f32,
        paint: Paint,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        paint: Paint,
    },
    /// Rectangle outline of `weight` pixels centred on the edge.
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        weight: f32,
        paint: Paint,
    },
}

impl RenderCommand {
    pub fn translated(&self, dx: f32, dy: f32) -> RenderCommand {
        let mut moved = self.clone();
        match &mut moved {
            RenderCommand::FillCircle { cx, cy, .. } => {
                *cx += dx;
                *cy += dy;
            }
            RenderCommand::FillRect { x, y, .. } | RenderCommand::StrokeRect { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
        }
        moved
    }

    pub fn paint(&self) -> Paint {
        match self {
            RenderCommand::FillCircle { paint, .. }
            | RenderCommand::FillRect { paint, .. }
            | RenderCommand::StrokeRect { paint, .. } => *paint,
        }
    }
}
