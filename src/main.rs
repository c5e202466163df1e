//! Kickball entry point
//!
//! On the web this wires the widget into the page. Natively it replays a
//! short focus sequence in virtual time and prints what the ball did.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde::Serialize;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, FocusEvent, HtmlElement};

    use kickball::sim::{Frame, SquashAnimation};
    use kickball::widget::{Effect, Event, KICK_KEYFRAMES, KickAnimation};
    use kickball::{BallWidget, InputRect, Layout, Tuning};

    // Element.animate isn't worth a dozen web-sys features
    #[wasm_bindgen(inline_js = "
        export function play_keyframes(el, frames_json, duration, on_finish) {
            const animation = el.animate(JSON.parse(frames_json), { duration, iterations: 1 });
            if (on_finish) {
                animation.onfinish = () => on_finish();
            }
        }
    ")]
    extern "C" {
        fn play_keyframes(
            el: &Element,
            frames_json: &str,
            duration: f64,
            on_finish: Option<&js_sys::Function>,
        );
    }

    /// One Web Animations keyframe
    #[derive(Serialize)]
    struct Keyframe {
        transform: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        opacity: Option<f32>,
    }

    /// Widget plus the sprites it drives
    struct Page {
        widget: BallWidget,
        ball: HtmlElement,
        ball_inner: HtmlElement,
        boot: HtmlElement,
    }

    fn ball_transform(position: f32, squash: f32) -> String {
        format!("translateY({}px) scaleY({})", position, squash)
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn viewport_height() -> f32 {
        web_sys::window()
            .and_then(|w| w.inner_height().ok())
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0) as f32
    }

    fn query(document: &Document, selector: &str) -> Result<HtmlElement, JsValue> {
        document
            .query_selector(selector)?
            .ok_or_else(|| JsValue::from_str(&format!("missing element {}", selector)))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsValue::from_str(&format!("{} is not an HTML element", selector)))
    }

    /// Feed an event to the widget and apply whatever it asks for
    fn dispatch(page: &Rc<RefCell<Page>>, event: Event) {
        let effects = page.borrow_mut().widget.handle(event, now());
        for effect in effects {
            if let Err(e) = apply(page, effect) {
                log::error!("Failed to apply {:?}: {:?}", effect, e);
            }
        }
    }

    fn apply(page: &Rc<RefCell<Page>>, effect: Effect) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        match effect {
            Effect::Render(Frame { position, squash }) => {
                let p = page.borrow();
                p.ball
                    .style()
                    .set_property("transform", &ball_transform(position, squash))?;
            }
            Effect::Rotate(degrees) => {
                let p = page.borrow();
                p.ball_inner
                    .style()
                    .set_property("transform", &format!("rotate({}deg)", degrees))?;
            }
            Effect::Kick(kick) => play_kick(&page.borrow().boot, kick)?,
            Effect::Squash(squash) => {
                let callback = {
                    let page = page.clone();
                    Closure::once_into_js(move || dispatch(&page, Event::ImpactPlaybackDone))
                };
                play_squash(&page.borrow().ball, squash, callback.unchecked_ref())?;
            }
            Effect::Schedule(scheduled) => {
                let page = page.clone();
                let event = scheduled.event;
                let callback = Closure::once_into_js(move || dispatch(&page, event));
                window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.unchecked_ref(),
                    scheduled.delay_ms as i32,
                )?;
            }
            Effect::RequestFrame => {
                let page = page.clone();
                let callback = Closure::once_into_js(move |_time: f64| {
                    let viewport_height = viewport_height();
                    dispatch(&page, Event::Frame { viewport_height });
                });
                window.request_animation_frame(callback.unchecked_ref())?;
            }
        }
        Ok(())
    }

    fn play_kick(boot: &HtmlElement, kick: KickAnimation) -> Result<(), JsValue> {
        boot.style().set_property("top", &format!("{}px", kick.top))?;
        let frames: Vec<Keyframe> = KICK_KEYFRAMES
            .iter()
            .map(|&(angle, opacity)| Keyframe {
                transform: format!("rotate({}deg)", angle),
                opacity: Some(opacity),
            })
            .collect();
        let json = serde_json::to_string(&frames).map_err(|e| JsValue::from_str(&e.to_string()))?;
        play_keyframes(boot, &json, kick.duration_ms as f64, None);
        Ok(())
    }

    fn play_squash(
        ball: &HtmlElement,
        squash: SquashAnimation,
        on_finish: &js_sys::Function,
    ) -> Result<(), JsValue> {
        ball.style().set_property(
            "transform",
            &ball_transform(squash.position, squash.keyframes[0]),
        )?;
        let frames: Vec<Keyframe> = squash
            .keyframes
            .iter()
            .map(|&scale| Keyframe {
                transform: ball_transform(squash.position, scale),
                opacity: None,
            })
            .collect();
        let json = serde_json::to_string(&frames).map_err(|e| JsValue::from_str(&e.to_string()))?;
        play_keyframes(ball, &json, squash.duration_ms as f64, Some(on_finish));
        Ok(())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Kickball starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let tuning = Tuning::load();

        let ball = query(&document, ".ball")?;
        let ball_inner = query(&document, ".ball-inner")?;
        let boot = query(&document, ".boot")?;

        // Measure every tracked input once
        let nodes = document.query_selector_all(".form-input")?;
        let mut inputs = Vec::with_capacity(nodes.length() as usize);
        for i in 0..nodes.length() {
            let Some(input) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let rect = input.get_bounding_client_rect();
            inputs.push((
                input,
                InputRect {
                    x: rect.x() as f32,
                    bottom: rect.bottom() as f32,
                },
            ));
        }

        let rects: Vec<InputRect> = inputs.iter().map(|(_, rect)| *rect).collect();
        let layout = Layout::from_inputs(&rects, &tuning);
        ball.style()
            .set_property("left", &format!("{}px", layout.ball_anchor.x))?;
        boot.style()
            .set_property("left", &format!("{}px", layout.boot_anchor.x))?;
        ball.style()
            .set_property("transform", &ball_transform(layout.ball_anchor.y, 1.0))?;

        log::info!("Tracking {} inputs", layout.floors.len());

        let page = Rc::new(RefCell::new(Page {
            widget: BallWidget::new(layout.floors, tuning),
            ball,
            ball_inner,
            boot,
        }));

        for (index, (input, _)) in inputs.iter().enumerate() {
            {
                let page = page.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: FocusEvent| {
                    dispatch(&page, Event::Focus(index));
                });
                input.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())?;
                closure.forget();
            }
            {
                let page = page.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: FocusEvent| {
                    dispatch(&page, Event::Blur);
                });
                input.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
                closure.forget();
            }
        }

        // The form is decorative
        if let Some(form) = document.query_selector("form")? {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        log::info!("Kickball ready!");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_page::run() {
        log::error!("Kickball failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Kickball (native) starting...");
    log::info!("Native mode replays a focus sequence - serve the wasm build for the real page");

    replay_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn replay_demo() {
    use kickball::widget::{Effect, Event};
    use kickball::{BallWidget, InputRect, Layout, Timeline, Tuning};

    const VIEWPORT: f32 = 800.0;

    let tuning = Tuning::load();
    let inputs = [
        InputRect { x: 120.0, bottom: 180.0 },
        InputRect { x: 120.0, bottom: 260.0 },
        InputRect { x: 120.0, bottom: 340.0 },
    ];
    let layout = Layout::from_inputs(&inputs, &tuning);
    let mut timeline = Timeline::new(BallWidget::new(layout.floors, tuning), VIEWPORT);

    let steps = [
        ("focus input 0", Event::Focus(0)),
        ("tab to input 2", Event::Focus(2)),
        ("click back to input 1", Event::Focus(1)),
        ("blur", Event::Blur),
    ];

    for (label, event) in steps {
        let start = timeline.effects().len();
        if matches!(event, Event::Focus(_)) {
            timeline.dispatch(Event::Blur);
        }
        timeline.dispatch(event);
        let idle = timeline.run_until_idle(30_000.0);

        println!("\n{} (t = {:.0}ms)", label, timeline.now());
        for (time, effect) in &timeline.effects()[start..] {
            match effect {
                Effect::Kick(kick) => println!("  {:>7.0}ms  kick from {:.1}px", time, kick.top),
                Effect::Squash(squash) => println!(
                    "  {:>7.0}ms  bounce at {:.1}px, squash to {:.2} for {:.0}ms",
                    time,
                    squash.position,
                    squash.squash_to(),
                    squash.duration_ms
                ),
                Effect::Render(frame) if frame.squash == 1.0 => {
                    println!("  {:>7.0}ms  resting at {:.1}px", time, frame.position)
                }
                _ => {}
            }
        }

        let state = timeline.widget().state();
        println!(
            "  -> {:?} at {:.1}px (settled: {})",
            state.phase, state.position, idle
        );
    }
}
