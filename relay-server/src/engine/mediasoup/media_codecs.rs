use mediasoup::prelude::{
    MimeTypeAudio, MimeTypeVideo, RtcpFeedback, RtpCodecCapability,
    RtpCodecParametersParameters,
};
use std::num::{NonZeroU8, NonZeroU32};

const AUDIO_CLOCK_RATE: u32 = 48_000;
const VIDEO_CLOCK_RATE: u32 = 90_000;

fn video_feedback() -> Vec<RtcpFeedback> {
    vec![
        RtcpFeedback::Nack,
        RtcpFeedback::NackPli,
        RtcpFeedback::CcmFir,
        RtcpFeedback::GoogRemb,
        RtcpFeedback::TransportCc,
    ]
}

fn h264(profile_level_id: &'static str) -> RtpCodecCapability {
    RtpCodecCapability::Video {
        mime_type: MimeTypeVideo::H264,
        preferred_payload_type: None,
        clock_rate: NonZeroU32::new(VIDEO_CLOCK_RATE).unwrap_or(NonZeroU32::MIN),
        parameters: RtpCodecParametersParameters::from([
            ("packetization-mode", 1_u32.into()),
            ("profile-level-id", profile_level_id.into()),
            ("level-asymmetry-allowed", 1_u32.into()),
        ]),
        rtcp_feedback: video_feedback(),
    }
}

/// Codecs the router accepts from producers.
pub fn media_codecs() -> Vec<RtpCodecCapability> {
    vec![
        RtpCodecCapability::Audio {
            mime_type: MimeTypeAudio::Opus,
            preferred_payload_type: None,
            clock_rate: NonZeroU32::new(AUDIO_CLOCK_RATE).unwrap_or(NonZeroU32::MIN),
            channels: NonZeroU8::new(2).unwrap_or(NonZeroU8::MIN),
            parameters: RtpCodecParametersParameters::from([("useinbandfec", 1_u32.into())]),
            rtcp_feedback: vec![RtcpFeedback::TransportCc],
        },
        RtpCodecCapability::Video {
            mime_type: MimeTypeVideo::Vp8,
            preferred_payload_type: None,
            clock_rate: NonZeroU32::new(VIDEO_CLOCK_RATE).unwrap_or(NonZeroU32::MIN),
            parameters: RtpCodecParametersParameters::from([(
                "x-google-start-bitrate",
                1000_u32.into(),
            )]),
            rtcp_feedback: video_feedback(),
        },
        h264("4d0032"),
        h264("42e01f"),
    ]
}
