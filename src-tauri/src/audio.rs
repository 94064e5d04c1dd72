use caresync_core::vad::{VadSettings, VadSignal, VoiceActivityDetector};
use caresync_core::{Capability, CaptureBackend, CaptureError, SessionId};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use hound::{WavSpec, WavWriter};
use std::io::Cursor;
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 录音控制指令
pub enum AudioCommand {
    Start(SessionId),
    Stop,
}

/// 音频线程发给会话调度的信号
#[derive(Debug)]
pub enum AudioSignal {
    /// VAD 判断会话该结束了
    Vad(SessionId, VadSignal),
    /// 录音过程中音频流出错
    StreamError(SessionId, String),
}

/// 本地麦克风采集
pub struct NativeCapture {
    /// 录音数据缓冲区（f32 单声道 PCM）
    buffer: Arc<Mutex<Vec<f32>>>,
    /// 采样率
    sample_rate: u32,
    /// 控制指令发送端
    cmd_tx: Sender<AudioCommand>,
}

impl NativeCapture {
    /// 探测麦克风并启动音频采集线程（cpal::Stream 不是 Send，需要专用线程）
    ///
    /// 等音频线程建好音频流才返回。没有麦克风或音频流建立失败时返回 Err，
    /// 调用方应退回手动输入。
    pub fn start(settings: VadSettings, signal_tx: Sender<AudioSignal>) -> Result<Self, String> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or("未找到麦克风设备")?;
        let supported_config = device
            .default_input_config()
            .map_err(|e| format!("获取麦克风配置失败: {e}"))?;

        let sample_rate = supported_config.sample_rate().0;
        let channels = supported_config.channels();
        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(0);
        let buffer = Arc::new(Mutex::new(Vec::new()));

        let worker = AudioWorker {
            device,
            config,
            channels,
            buffer: buffer.clone(),
            recording: Arc::new(Mutex::new(None)),
            vad: Arc::new(Mutex::new(VoiceActivityDetector::new(settings, sample_rate))),
            signal_tx,
        };
        std::thread::spawn(move || worker.run(cmd_rx, ready_tx));
        await_ready(&ready_rx)?;

        log::info!("麦克风已就绪: {sample_rate}Hz, {channels} 声道");
        Ok(Self {
            buffer,
            sample_rate,
            cmd_tx,
        })
    }

    fn send(&self, cmd: AudioCommand) -> Result<(), CaptureError> {
        self.cmd_tx
            .send(cmd)
            .map_err(|e| CaptureError::Other(format!("发送录音指令失败: {e}")))
    }
}

impl CaptureBackend for NativeCapture {
    fn capability(&self) -> Capability {
        Capability::Native
    }

    fn begin(&mut self, session: SessionId) -> Result<(), CaptureError> {
        self.send(AudioCommand::Start(session))
    }

    fn end(&mut self) -> Result<Vec<u8>, CaptureError> {
        self.send(AudioCommand::Stop)?;
        // 等待录音线程处理完停止指令
        std::thread::sleep(Duration::from_millis(100));
        let samples = std::mem::take(&mut *self.buffer.lock().unwrap());
        if samples.is_empty() {
            return Err(CaptureError::NoSpeech);
        }
        encode_wav(&samples, self.sample_rate).map_err(CaptureError::Other)
    }

    fn abort(&mut self) {
        if let Err(e) = self.send(AudioCommand::Stop) {
            log::error!("停止录音失败: {e}");
        }
    }
}

/// 音频线程持有的状态
struct AudioWorker {
    device: cpal::Device,
    config: cpal::StreamConfig,
    channels: u16,
    buffer: Arc<Mutex<Vec<f32>>>,
    /// 正在录音的会话
    recording: Arc<Mutex<Option<SessionId>>>,
    vad: Arc<Mutex<VoiceActivityDetector>>,
    signal_tx: Sender<AudioSignal>,
}

impl AudioWorker {
    fn run(self, cmd_rx: Receiver<AudioCommand>, ready_tx: SyncSender<Result<(), CaptureError>>) {
        let stream = match self.build_stream() {
            Ok(stream) => stream,
            Err(e) => {
                log::error!("创建音频流失败: {e}");
                let _ = ready_tx.send(Err(e));
                return;
            }
        };
        if ready_tx.send(Ok(())).is_err() {
            return;
        }

        // 等待控制指令
        loop {
            match cmd_rx.recv() {
                Ok(AudioCommand::Start(session)) => {
                    self.buffer.lock().unwrap().clear();
                    self.vad.lock().unwrap().reset();
                    *self.recording.lock().unwrap() = Some(session);
                    log::info!("开始录音 {session}");
                }
                Ok(AudioCommand::Stop) => {
                    if let Some(session) = self.recording.lock().unwrap().take() {
                        log::info!("停止录音 {session}");
                    }
                }
                Err(_) => {
                    // 发送端已关闭，退出线程
                    log::info!("音频线程退出");
                    break;
                }
            }
        }
        drop(stream);
    }

    fn build_stream(&self) -> Result<cpal::Stream, CaptureError> {
        let channels = self.channels;
        let buffer = self.buffer.clone();
        let recording = self.recording.clone();
        let vad = self.vad.clone();
        let signal_tx = self.signal_tx.clone();
        let err_recording = self.recording.clone();
        let err_tx = self.signal_tx.clone();

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let Some(session) = *recording.lock().unwrap() else {
                        return;
                    };
                    let mono = downmix(data, channels);
                    buffer.lock().unwrap().extend_from_slice(&mono);
                    if let Some(signal) = vad.lock().unwrap().process_frame(&mono) {
                        let _ = signal_tx.send(AudioSignal::Vad(session, signal));
                    }
                },
                move |err| {
                    log::error!("音频流错误: {err}");
                    if let Some(session) = *err_recording.lock().unwrap() {
                        let _ = err_tx.send(AudioSignal::StreamError(session, err.to_string()));
                    }
                },
                None,
            )
            .map_err(classify_build_error)?;

        stream
            .play()
            .map_err(|e| CaptureError::Other(format!("启动音频流失败: {e}")))?;
        Ok(stream)
    }
}

/// 等待音频线程报告音频流是否建好
fn await_ready(ready_rx: &Receiver<Result<(), CaptureError>>) -> Result<(), String> {
    match ready_rx.recv() {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(format!("音频流不可用: {e}")),
        Err(_) => Err("音频线程意外退出".to_string()),
    }
}

/// 设备不可用多半是系统拒绝了麦克风权限
fn classify_build_error(e: cpal::BuildStreamError) -> CaptureError {
    match e {
        cpal::BuildStreamError::DeviceNotAvailable => CaptureError::PermissionDenied,
        other => CaptureError::Other(format!("创建音频流失败: {other}")),
    }
}

/// 多声道转单声道
fn downmix(data: &[f32], channels: u16) -> Vec<f32> {
    if channels > 1 {
        data.chunks(channels as usize)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        data.to_vec()
    }
}

/// 将 PCM f32 数据编码为 16 位单声道 WAV
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, String> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            WavWriter::new(&mut cursor, spec).map_err(|e| format!("创建 WAV 写入器失败: {e}"))?;
        for &sample in samples {
            // f32 [-1.0, 1.0] → i16
            let s = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(s)
                .map_err(|e| format!("写入 WAV 样本失败: {e}"))?;
        }
        writer
            .finalize()
            .map_err(|e| format!("完成 WAV 编码失败: {e}"))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_averages_channels() {
        assert_eq!(downmix(&[0.25, 0.75, -1.0, 1.0], 2), vec![0.5, 0.0]);
        assert_eq!(downmix(&[0.5, 0.25], 1), vec![0.5, 0.25]);
    }

    #[test]
    fn wav_round_trips_through_hound() {
        let wav = encode_wav(&[0.0, 0.5, -0.5, 1.0], 16000).unwrap();
        let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, 16383, -16383, 32767]);
    }

    #[test]
    fn start_waits_for_the_stream_outcome() {
        let (tx, rx) = mpsc::sync_channel(1);
        tx.send(Ok(())).unwrap();
        assert_eq!(await_ready(&rx), Ok(()));

        let (tx, rx) = mpsc::sync_channel(1);
        tx.send(Err(CaptureError::PermissionDenied)).unwrap();
        let err = await_ready(&rx).unwrap_err();
        assert!(err.contains("permission-denied"));

        // 线程没来得及回复就退出
        let (tx, rx) = mpsc::sync_channel::<Result<(), CaptureError>>(1);
        drop(tx);
        assert!(await_ready(&rx).is_err());
    }

    #[test]
    fn unavailable_device_means_permission_denied() {
        assert_eq!(
            classify_build_error(cpal::BuildStreamError::DeviceNotAvailable),
            CaptureError::PermissionDenied
        );
        assert!(matches!(
            classify_build_error(cpal::BuildStreamError::InvalidArgument),
            CaptureError::Other(_)
        ));
    }
}
