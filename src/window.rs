use std::path::PathBuf;

use piston_window::{
    Button,
    Context,
    EventLoop,
    G2d,
    Glyphs,
    Key,
    OpenGL,
    PistonWindow,
    ReleaseEvent,
    WindowSettings,
};

use crate::bounds::EmptyInputError;
use crate::plot::{Canvas, Color, Figure, PlotConfig};

const SCREEN_WIDTH: u32 = 1280;
const SCREEN_HEIGHT: u32 = 520;
const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const FONT_FILE: &str = "FiraSans-Regular.ttf";

#[derive(Debug)]
pub enum PistonError {
    BuildWindow(String),
    DrawText(String),
}

struct PistonCanvas<'a, 'b: 'a> {
    context: Context,
    g2d: &'a mut G2d<'b>,
    glyphs: Option<&'a mut Glyphs>,
}

impl<'a, 'b> Canvas for PistonCanvas<'a, 'b> {
    type Error = PistonError;

    fn line(&mut self, color: Color, width: f64, from: [f64; 2], to: [f64; 2]) {
        piston_window::line(color.0, width / 2., [from[0], from[1], to[0], to[1]], self.context.transform, &mut *self.g2d);
    }

    fn marker(&mut self, color: Color, center: [f64; 2], radius: f64) {
        piston_window::ellipse(
            color.0,
            [center[0] - radius, center[1] - radius, radius * 2., radius * 2.],
            self.context.transform,
            &mut *self.g2d,
        );
    }

    fn text(&mut self, color: Color, size: u32, at: [f64; 2], text: &str) -> Result<(), PistonError> {
        use piston_window::Transformed;

        // no font, no labels
        if let Some(ref mut glyphs) = self.glyphs {
            piston_window::text::Text::new_color(color.0, size).draw(
                text,
                &mut **glyphs,
                &self.context.draw_state,
                self.context.transform.trans(at[0], at[1]),
                &mut *self.g2d,
            ).map_err(|e| PistonError::DrawText(format!("{:?}", e)))?;
        }
        Ok(())
    }

    fn text_width(&mut self, size: u32, text: &str) -> f64 {
        use piston_window::CharacterCache;

        match self.glyphs {
            Some(ref mut glyphs) =>
                glyphs.width(size, text).unwrap_or(0.),
            // nothing gets drawn without a font
            None =>
                0.,
        }
    }
}

/// Opens the plot window on `figure` and runs its event loop until `Q` or
/// `Esc`.
///
/// `T` toggles subplot tiling and `L` toggles loop closing; both rebuild
/// the figure through `build`. A rebuild that fails keeps the figure shown.
pub fn show<F>(title: &str, assets_dir: &str, mut config: PlotConfig, mut figure: Figure, build: F) -> Result<(), PistonError>
    where F: Fn(&PlotConfig) -> Result<Figure, EmptyInputError>
{
    let mut window: PistonWindow = WindowSettings::new(title, [SCREEN_WIDTH, SCREEN_HEIGHT])
        .exit_on_esc(true)
        .graphics_api(OpenGL::V3_2)
        .build()
        .map_err(|e| PistonError::BuildWindow(e.to_string()))?;
    window.set_lazy(true);

    let mut font_path = PathBuf::from(assets_dir);
    font_path.push(FONT_FILE);
    let mut glyphs = match window.load_font(&font_path) {
        Ok(glyphs) =>
            Some(glyphs),
        Err(e) => {
            warn!("cannot load font {}: {}, drawing without text", font_path.display(), e);
            None
        },
    };

    info!("showing {} panel(s), <T> toggles tiling, <L> toggles loop closing, <Q> exits", figure.panels.len());
    while let Some(event) = window.next() {
        let maybe_result = window.draw_2d(&event, |context, g2d, device| {
            piston_window::clear(BACKGROUND, g2d);
            let size = context.get_view_size();
            let result = {
                let mut canvas = PistonCanvas { context, g2d, glyphs: glyphs.as_mut(), };
                figure.draw(&mut canvas, size)
            };
            if let Some(ref mut glyphs) = glyphs {
                glyphs.factory.encoder.flush(device);
            }
            result
        });
        if let Some(result) = maybe_result {
            let () = result?;
        }

        if let Some(Button::Keyboard(key)) = event.release_args() {
            match key {
                Key::Q =>
                    break,
                Key::T => {
                    config.tile_subplots = !config.tile_subplots;
                    rebuild(&build, &config, &mut figure);
                },
                Key::L => {
                    config.close_loop = !config.close_loop;
                    rebuild(&build, &config, &mut figure);
                },
                _ =>
                    (),
            }
        }
    }

    Ok(())
}

fn rebuild<F>(build: &F, config: &PlotConfig, figure: &mut Figure)
    where F: Fn(&PlotConfig) -> Result<Figure, EmptyInputError>
{
    match build(config) {
        Ok(rebuilt) => {
            debug!("rebuilt with {:?}, {} panel(s)", config, rebuilt.panels.len());
            *figure = rebuilt;
        },
        Err(e) =>
            warn!("cannot rebuild figure with {:?}: {}", config, e),
    }
}
