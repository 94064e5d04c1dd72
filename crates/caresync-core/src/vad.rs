/// VAD 状态机状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VadState {
    /// 空闲，等待语音
    Idle,
    /// 检测到语音，正在录音
    Speaking,
    /// 已发出信号，等待会话结束
    Done,
}

/// VAD 发给采集会话的信号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadSignal {
    /// 语音段结束，应当结束录音并识别
    SpeechEnded,
    /// 超时仍未检测到语音
    NoSpeech,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VadSettings {
    /// RMS 能量阈值
    pub speech_threshold: f32,
    /// 静音超时（毫秒）
    pub silence_timeout_ms: u64,
    /// 最短语音段（毫秒）
    pub min_speech_duration_ms: u64,
    /// 开始后多久没有语音就放弃（毫秒）
    pub no_speech_timeout_ms: u64,
}

impl Default for VadSettings {
    fn default() -> Self {
        Self {
            speech_threshold: 0.03,
            silence_timeout_ms: 800,
            min_speech_duration_ms: 300,
            no_speech_timeout_ms: 5000,
        }
    }
}

/// 语音活动检测器
///
/// 时间按已处理的样本数计算，不依赖系统时钟。
pub struct VoiceActivityDetector {
    pub state: VadState,
    settings: VadSettings,
    sample_rate: u32,
    /// 会话开始以来处理的样本数
    elapsed: u64,
    /// 语音开始位置（样本）
    speech_start: Option<u64>,
    /// 最后检测到语音的位置（样本）
    last_speech: Option<u64>,
}

impl VoiceActivityDetector {
    pub fn new(settings: VadSettings, sample_rate: u32) -> Self {
        Self {
            state: VadState::Idle,
            settings,
            sample_rate: sample_rate.max(1),
            elapsed: 0,
            speech_start: None,
            last_speech: None,
        }
    }

    /// 计算音频帧的 RMS 能量
    fn rms(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum: f32 = samples.iter().map(|s| s * s).sum();
        (sum / samples.len() as f32).sqrt()
    }

    fn millis(&self, samples: u64) -> u64 {
        samples * 1000 / self.sample_rate as u64
    }

    /// 处理一帧单声道音频，需要结束会话时返回信号
    pub fn process_frame(&mut self, samples: &[f32]) -> Option<VadSignal> {
        if self.state == VadState::Done {
            return None;
        }
        let is_speech = Self::rms(samples) > self.settings.speech_threshold;
        self.elapsed += samples.len() as u64;
        let now = self.elapsed;

        match self.state {
            VadState::Idle => {
                if is_speech {
                    self.state = VadState::Speaking;
                    self.speech_start = Some(now);
                    self.last_speech = Some(now);
                    log::info!("VAD: 检测到语音开始");
                } else if self.millis(now) >= self.settings.no_speech_timeout_ms {
                    self.state = VadState::Done;
                    log::info!("VAD: {}ms 内未检测到语音", self.settings.no_speech_timeout_ms);
                    return Some(VadSignal::NoSpeech);
                }
                None
            }
            VadState::Speaking => {
                if is_speech {
                    self.last_speech = Some(now);
                    return None;
                }
                let (Some(start), Some(last)) = (self.speech_start, self.last_speech) else {
                    return None;
                };
                if self.millis(now - last) < self.settings.silence_timeout_ms {
                    return None;
                }
                let speech_ms = self.millis(last - start);
                if speech_ms >= self.settings.min_speech_duration_ms {
                    self.state = VadState::Done;
                    log::info!("VAD: 语音段结束，时长 {speech_ms}ms");
                    return Some(VadSignal::SpeechEnded);
                }
                // 语音段太短，当作噪声，继续等待
                log::info!("VAD: 语音段过短，丢弃");
                self.state = VadState::Idle;
                self.speech_start = None;
                self.last_speech = None;
                None
            }
            VadState::Done => None,
        }
    }

    /// 新会话开始前重置
    pub fn reset(&mut self) {
        self.state = VadState::Idle;
        self.elapsed = 0;
        self.speech_start = None;
        self.last_speech = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 1000;

    fn frame(level: f32, ms: usize) -> Vec<f32> {
        vec![level; ms * RATE as usize / 1000]
    }

    fn detector() -> VoiceActivityDetector {
        VoiceActivityDetector::new(
            VadSettings {
                speech_threshold: 0.1,
                silence_timeout_ms: 200,
                min_speech_duration_ms: 100,
                no_speech_timeout_ms: 1000,
            },
            RATE,
        )
    }

    #[test]
    fn speech_then_silence_ends_segment() {
        let mut vad = detector();
        assert_eq!(vad.process_frame(&frame(0.5, 50)), None);
        assert_eq!(vad.process_frame(&frame(0.5, 200)), None);
        assert_eq!(vad.process_frame(&frame(0.0, 100)), None);
        assert_eq!(vad.process_frame(&frame(0.0, 100)), Some(VadSignal::SpeechEnded));
        assert_eq!(vad.state, VadState::Done);
        assert_eq!(vad.process_frame(&frame(0.5, 100)), None);
    }

    #[test]
    fn silence_only_times_out() {
        let mut vad = detector();
        for _ in 0..9 {
            assert_eq!(vad.process_frame(&frame(0.0, 100)), None);
        }
        assert_eq!(vad.process_frame(&frame(0.0, 100)), Some(VadSignal::NoSpeech));
    }

    #[test]
    fn short_blip_is_ignored() {
        let mut vad = detector();
        assert_eq!(vad.process_frame(&frame(0.5, 20)), None);
        assert_eq!(vad.process_frame(&frame(0.0, 250)), None);
        assert_eq!(vad.state, VadState::Idle);
    }

    #[test]
    fn reset_restarts_timers() {
        let mut vad = detector();
        for _ in 0..10 {
            vad.process_frame(&frame(0.0, 100));
        }
        vad.reset();
        assert_eq!(vad.state, VadState::Idle);
        assert_eq!(vad.process_frame(&frame(0.0, 100)), None);
    }
}
