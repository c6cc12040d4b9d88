use crate::types::{DistanceEffect, MagicEffect, Position, SoundEffect};

/// Client-visible effect broadcast. Fire-and-forget.
pub trait EffectSink {
    fn magic_effect(&mut self, position: Position, effect: MagicEffect);

    fn distance_effect(&mut self, from: Position, to: Position, effect: DistanceEffect);

    fn sound_effect(&mut self, position: Position, sound: SoundEffect);
}

/// Sink that drops every effect, for headless resolution.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn magic_effect(&mut self, _position: Position, _effect: MagicEffect) {}

    fn distance_effect(&mut self, _from: Position, _to: Position, _effect: DistanceEffect) {}

    fn sound_effect(&mut self, _position: Position, _sound: SoundEffect) {}
}
