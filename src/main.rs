use std::sync::Arc;
use std::thread;
use std::time::Instant;
use TrafficLightMini::core::light::TrafficLight;
use TrafficLightMini::core::log::append_logs;

fn main() {
    // Two independent lights for example
    let light_ids: Vec<String> = (0..2).map(|i| format!("L{}", i)).collect();

    let mut lights = Vec::new();
    for id in &light_ids {
        lights.push(Arc::new(TrafficLight::new(id.clone())));
    }

    let started = Instant::now();

    // Start each light's cycling thread
    for light in &lights {
        light.simulate();
    }

    let mut handles = vec![];

    // Spawn a vehicle thread per light that waits for its green
    for light in lights.clone() {
        let light_clone = light.clone();
        handles.push(thread::spawn(move || {
            println!(
                "{:6.3} s | vehicle at {} waiting (phase {:?})",
                started.elapsed().as_millis() as f32 / 1000.,
                light_clone.light_id(),
                light_clone.current_phase(),
            );
            light_clone.wait_for_green();
            println!(
                "{:6.3} s | vehicle at {} crossing on green",
                started.elapsed().as_millis() as f32 / 1000.,
                light_clone.light_id(),
            );
        }));
    }

    // Wait for all vehicles to cross
    for handle in handles {
        handle.join().unwrap();
    }

    // Append the transition history for all lights as NDJSON
    for light in &lights {
        append_logs(&light.logs(), "output.ndjson").expect("Failed to append logs");
        light.stop();
    }
}
