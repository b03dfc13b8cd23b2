//! Animation mixers advanced once per frame by wall-clock delta.

use crate::scene::Node;

/// Anything that advances a node's animation state by a time delta (seconds).
pub trait Mixer: std::fmt::Debug {
    fn update(&mut self, dt: f32, node: &mut Node);

    /// Current clip time in seconds.
    fn time(&self) -> f32;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MorphKeyframe {
    pub time: f32,
    pub weights: Vec<f32>,
}

/// A morph-target clip: keyframes sorted by time.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphClip {
    pub name: String,
    keyframes: Vec<MorphKeyframe>,
}

impl MorphClip {
    pub fn new(name: impl Into<String>, mut keyframes: Vec<MorphKeyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            name: name.into(),
            keyframes,
        }
    }

    pub fn duration(&self) -> f32 {
        self.keyframes.last().map(|k| k.time).unwrap_or(0.0)
    }

    /// Linearly interpolated weights at time `t`.
    pub fn sample(&self, t: f32) -> Vec<f32> {
        let Some(first) = self.keyframes.first() else {
            return Vec::new();
        };
        if t <= first.time {
            return first.weights.clone();
        }
        for pair in self.keyframes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t <= b.time {
                let span = b.time - a.time;
                let s = if span > 0.0 { (t - a.time) / span } else { 1.0 };
                return a
                    .weights
                    .iter()
                    .zip(&b.weights)
                    .map(|(wa, wb)| wa + (wb - wa) * s)
                    .collect();
            }
        }
        self.keyframes
            .last()
            .map(|k| k.weights.clone())
            .unwrap_or_default()
    }
}

/// Plays a [`MorphClip`] onto the morph weights of a mesh node.
#[derive(Debug, Clone)]
pub struct MorphMixer {
    clip: MorphClip,
    time: f32,
    pub time_scale: f32,
    pub looping: bool,
}

impl MorphMixer {
    pub fn new(clip: MorphClip) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            looping: true,
        }
    }

    pub fn clip(&self) -> &MorphClip {
        &self.clip
    }
}

impl Mixer for MorphMixer {
    fn update(&mut self, dt: f32, node: &mut Node) {
        let duration = self.clip.duration();
        self.time += dt * self.time_scale;
        if duration > 0.0 {
            self.time = if self.looping {
                self.time.rem_euclid(duration)
            } else {
                self.time.clamp(0.0, duration)
            };
        }
        if let Some(mesh) = node.as_mesh_mut() {
            mesh.morph_weights = self.clip.sample(self.time);
        }
    }

    fn time(&self) -> f32 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoxParams, Geometry};
    use crate::material::MaterialDesc;
    use crate::scene::MeshNode;

    fn clip() -> MorphClip {
        MorphClip::new(
            "pulse",
            vec![
                MorphKeyframe {
                    time: 1.0,
                    weights: vec![1.0],
                },
                MorphKeyframe {
                    time: 0.0,
                    weights: vec![0.0],
                },
            ],
        )
    }

    fn node() -> Node {
        Node::mesh(
            "m",
            MeshNode::new(Geometry::Box(BoxParams::default()), MaterialDesc::default()),
        )
    }

    #[test]
    fn clip_sorts_and_interpolates() {
        let c = clip();
        assert_eq!(c.duration(), 1.0);
        assert_eq!(c.sample(-1.0), vec![0.0]);
        assert_eq!(c.sample(0.25), vec![0.25]);
        assert_eq!(c.sample(5.0), vec![1.0]);
    }

    #[test]
    fn mixer_writes_weights_and_loops() {
        let mut mixer = MorphMixer::new(clip());
        let mut n = node();
        mixer.update(0.5, &mut n);
        assert_eq!(n.as_mesh().unwrap().morph_weights, vec![0.5]);
        mixer.update(0.75, &mut n);
        assert!((mixer.time() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn non_looping_mixer_clamps() {
        let mut mixer = MorphMixer::new(clip());
        mixer.looping = false;
        let mut n = node();
        mixer.update(3.0, &mut n);
        assert_eq!(mixer.time(), 1.0);
        assert_eq!(n.as_mesh().unwrap().morph_weights, vec![1.0]);
    }
}
