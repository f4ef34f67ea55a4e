mod entropy_quality;
mod timing_sidechannel;
